//! CSV download of a guest category for the admin panel.

use crate::error::Result;
use crate::models::Guest;
use crate::stats::Category;

/// Lets spreadsheet programs detect UTF-8 so non-ASCII names survive.
const BOM: &str = "\u{feff}";

pub fn guests_csv<'a>(guests: impl IntoIterator<Item = &'a Guest>) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["name", "code", "ceremony", "status", "guest_count", "views"])?;

    for guest in guests {
        let status = match guest.rsvp.response() {
            None => Category::Pending,
            Some(r) if r.is_attending => Category::Attending,
            Some(_) => Category::NotAttending,
        };
        let guest_count = guest.rsvp.attending_count().to_string();
        let views = guest.views.to_string();
        writer.write_record([
            guest.name.as_str(),
            guest.code.as_str(),
            if guest.ceremony { "yes" } else { "no" },
            status.as_str(),
            guest_count.as_str(),
            views.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(format!("{BOM}{}", String::from_utf8_lossy(&bytes)))
}

/// Download file name for `category`.
#[must_use]
pub fn file_name(category: Category) -> String {
    format!("guests-{category}.csv")
}
