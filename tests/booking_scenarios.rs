use chrono::{Days, NaiveDate};
use meeting_scheduler::schedule::FixedClock;
use meeting_scheduler::{
    DailySchedule, Event, Granularity, Notification, NotificationQueue, Reservation, Scheduler,
    SchedulerError, Slot,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn slot(label: &str) -> Slot {
    label.parse().unwrap()
}

fn scheduler_with(schedule: DailySchedule) -> (Scheduler, NotificationQueue) {
    let mut scheduler = Scheduler::with_clock(schedule, Box::new(FixedClock(today())));
    let queue = NotificationQueue::new();
    scheduler.subscribe(queue.clone());
    (scheduler, queue)
}

fn check_partition(scheduler: &Scheduler) {
    let available = scheduler.available_slots();
    let reserved = scheduler.reserved_on(scheduler.selected_date());

    assert!(available.windows(2).all(|w| w[0] < w[1]), "available slots out of order");
    assert!(available.iter().all(|s| !reserved.contains(s)), "slot both open and booked");

    let mut union: Vec<Slot> = available.iter().chain(reserved.iter()).copied().collect();
    union.sort();
    assert_eq!(union, scheduler.schedule().slots());
}

#[test]
fn book_then_cancel_today() {
    let (mut scheduler, _) = scheduler_with(DailySchedule::default());

    scheduler.book_slot(slot("09:00")).unwrap();
    assert!(!scheduler.available_slots().contains(&slot("09:00")));
    assert_eq!(scheduler.reservations(), vec![Reservation { date: today(), slot: slot("09:00") }]);

    scheduler.cancel_slot(slot("09:00")).unwrap();
    assert_eq!(scheduler.available_slots().first(), Some(&slot("09:00")));
    assert!(scheduler.reservations().is_empty());
}

#[test]
fn second_booking_two_days_out_conflicts() {
    let (mut scheduler, _) = scheduler_with(DailySchedule::default());
    let date = today() + Days::new(2);

    scheduler.apply(Event::SelectDate(date)).unwrap();
    scheduler.apply(Event::BookSlot(slot("10:00"))).unwrap();
    assert_eq!(
        scheduler.apply(Event::BookSlot(slot("10:00"))),
        Err(SchedulerError::AlreadyBooked { date, slot: slot("10:00") })
    );
}

#[test]
fn booking_then_canceling_restores_previous_state() {
    let (mut scheduler, _) = scheduler_with(DailySchedule::default());
    scheduler.book_slot(slot("13:00")).unwrap();
    scheduler.select_date(today() + Days::new(1));
    scheduler.book_slot(slot("11:00")).unwrap();

    for label in ["09:00", "12:00", "16:00"] {
        let table_before = scheduler.reservation_table().clone();
        let available_before = scheduler.available_slots().to_vec();

        scheduler.book_slot(slot(label)).unwrap();
        scheduler.cancel_slot(slot(label)).unwrap();

        assert_eq!(scheduler.reservation_table(), &table_before);
        assert_eq!(scheduler.available_slots(), available_before.as_slice());
    }
}

#[test]
fn past_dates_never_change_state() {
    let (mut scheduler, queue) = scheduler_with(DailySchedule::default());
    scheduler.book_slot(slot("15:00")).unwrap();
    queue.drain();

    for days_back in 1..=3 {
        let past = today() - Days::new(days_back);
        scheduler.select_date(past);
        let before = scheduler.reservation_table().clone();

        for s in scheduler.schedule().slots().to_vec() {
            assert_eq!(
                scheduler.book_slot(s),
                Err(SchedulerError::PastDate { date: past, today: today() })
            );
        }
        assert_eq!(scheduler.reservation_table(), &before);
        check_partition(&scheduler);
    }

    assert!(queue
        .drain()
        .iter()
        .all(|n| matches!(n, Notification::PastDateRejected { .. })));
}

#[test]
fn canceling_unbooked_slots_never_changes_state() {
    let (mut scheduler, _) = scheduler_with(DailySchedule::default());
    scheduler.book_slot(slot("10:00")).unwrap();
    let before = scheduler.reservation_table().clone();

    for s in scheduler.schedule().slots().to_vec() {
        if s == slot("10:00") {
            continue;
        }
        assert_eq!(
            scheduler.cancel_slot(s),
            Err(SchedulerError::NotReserved { date: today(), slot: s })
        );
    }
    assert_eq!(scheduler.reservation_table(), &before);
}

#[test]
fn long_mixed_sequence_keeps_invariants() {
    let schedule = DailySchedule::from_bounds("09:00", "17:00", Granularity::HalfHour).unwrap();
    let (mut scheduler, _) = scheduler_with(schedule);
    let slots = scheduler.schedule().slots().to_vec();

    // Deterministic walk over dates and slots mixing books and cancels
    let mut step: usize = 7;
    for round in 0..400usize {
        step = (step * 31 + 17) % 1009;
        let date = today() + Days::new((step % 4) as u64);
        let s = slots[step % slots.len()];

        scheduler.select_date(date);
        check_partition(&scheduler);

        let result = if round % 3 == 0 || scheduler.reserved_on(date).contains(&s) && round % 2 == 0 {
            scheduler.cancel_slot(s)
        } else {
            scheduler.book_slot(s)
        };

        match result {
            Ok(()) => {}
            Err(SchedulerError::AlreadyBooked { .. }) | Err(SchedulerError::NotReserved { .. }) => {}
            Err(other) => panic!("unexpected error {other:?}"),
        }
        check_partition(&scheduler);
    }

    let flattened = scheduler.reservations();
    assert!(flattened.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(flattened.len(), scheduler.reservation_table().len());
}

#[test]
fn reservations_do_not_leak_across_dates() {
    let (mut scheduler, _) = scheduler_with(DailySchedule::default());
    scheduler.book_slot(slot("09:00")).unwrap();

    let tomorrow = today() + Days::new(1);
    scheduler.select_date(tomorrow);
    assert_eq!(scheduler.available_slots().len(), 8);
    assert_eq!(
        scheduler.cancel_slot(slot("09:00")),
        Err(SchedulerError::NotReserved { date: tomorrow, slot: slot("09:00") })
    );
}
