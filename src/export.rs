use std::io::Write;

use csv::WriterBuilder;

use crate::schedule::Reservation;

/// Writes reservations as CSV with a `date,slot` header, one row per booking
/// in the order given.
pub fn write_reservations_csv<W: Write>(
    writer: W,
    reservations: &[Reservation],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    if reservations.is_empty() {
        // serialize() only emits the header alongside the first record
        wtr.write_record(["date", "slot"])?;
    }
    for reservation in reservations {
        wtr.serialize(reservation)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Convenience wrapper returning the CSV as a string
pub fn reservations_to_csv(reservations: &[Reservation]) -> Result<String, Box<dyn std::error::Error>> {
    let mut buffer = Vec::new();
    write_reservations_csv(&mut buffer, reservations)?;
    Ok(String::from_utf8(buffer)?)
}
