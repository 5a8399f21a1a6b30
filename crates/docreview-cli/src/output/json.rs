use docreview_core::error::DocReviewError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), DocReviewError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
