//! Bengali (bn-BD) strings and date formatting used on the card.

use chrono::{Datelike, Local, NaiveDate};

/// Default title shown before anything is extracted or typed.
pub const PLACEHOLDER_TITLE: &str = "এখানে আপনার সংবাদের শিরোনাম লিখুন";

/// Title used when the provider returns no title.
pub const TITLE_NOT_FOUND: &str = "শিরোনাম পাওয়া যায়নি";

/// Default source before anything is extracted or typed.
pub const PLACEHOLDER_SOURCE: &str = "www.example.com";

/// The one message shown for every extraction failure.
pub const EXTRACTION_FAILED: &str =
    "সংবাদের তথ্য আনতে ব্যর্থ হয়েছে। অনুগ্রহ করে লিংকটি যাচাই করুন অথবা তথ্যগুলো নিজে লিখুন।";

/// Static call-to-action badge text.
pub const CALL_TO_ACTION: &str = "বিস্তারিত কমেন্টে";

/// Label drawn on the built-in hero placeholder.
pub const NO_IMAGE: &str = "ছবি পাওয়া যায়নি";

const MONTHS: [&str; 12] = [
    "জানুয়ারী",
    "ফেব্রুয়ারী",
    "মার্চ",
    "এপ্রিল",
    "মে",
    "জুন",
    "জুলাই",
    "আগস্ট",
    "সেপ্টেম্বর",
    "অক্টোবর",
    "নভেম্বর",
    "ডিসেম্বর",
];

const DIGITS: [char; 10] = ['০', '১', '২', '৩', '৪', '৫', '৬', '৭', '৮', '৯'];

/// Replaces ASCII digits with Bengali digits, leaving everything else alone.
pub fn bengali_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                DIGITS[(c as u8 - b'0') as usize]
            } else {
                c
            }
        })
        .collect()
}

/// Formats a date the way `bn-BD` long dates read, e.g. `১৯ অক্টোবর, ২০২৬`.
pub fn format_bn_date(date: NaiveDate) -> String {
    let month = MONTHS[date.month0() as usize];
    format!(
        "{} {}, {}",
        bengali_digits(&date.day().to_string()),
        month,
        bengali_digits(&date.year().to_string())
    )
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn today_bn() -> String {
    format_bn_date(today())
}
