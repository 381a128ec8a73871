//! Common regex patterns for UAE tax invoice extraction.
//!
//! Each field has its patterns listed strictest first; the extractors try
//! them in that order.

use lazy_static::lazy_static;
use regex::Regex;

/// Amount literal: optional thousands separators, up to 2 decimals.
const AMOUNT: &str = r"(\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?)";

const MONTHS: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

lazy_static! {
    // TRN (Tax Registration Number)
    pub static ref TRN_LABELED: Regex = Regex::new(
        r"(?i)\b(?:TRN|tax\s+registration)(?:\s*(?:number\b|no\b\.?))?\s*[:#.\-]?\s*(\d+)"
    ).unwrap();

    pub static ref TRN_GROUPED: Regex = Regex::new(
        r"(?i)\b(?:TRN|tax\s+registration)(?:\s*(?:number\b|no\b\.?))?\s*[:#.\-]?\s*(\d{3,4}(?:[ \-]\d{3,4}){2,4})"
    ).unwrap();

    pub static ref DIGIT_RUN: Regex = Regex::new(r"\d+").unwrap();

    // Invoice number
    pub static ref INVOICE_NUMBER_LABELED: Regex = Regex::new(
        r"(?i)\binvoice\s*(?:number\b|no\b\.?|#|reference\b|ref\b\.?)\s*[:\-]?\s*([A-Za-z0-9/\-_]+)"
    ).unwrap();

    pub static ref INVOICE_NUMBER_BARE: Regex = Regex::new(
        r"(?i)\binvoice\s*[:\-]?\s*([A-Za-z0-9/\-_]+)"
    ).unwrap();

    pub static ref NUMBER_SHORT: Regex = Regex::new(
        r"(?:\b[Nn][Oo]\.|#)\s*([A-Za-z0-9/\-_]+)"
    ).unwrap();

    // Dates
    pub static ref DATE_LABEL: Regex = Regex::new(
        r"(?i)\b(?:invoice\s+|issue\s+)?date(?:\s+of\s+(?:issue|supply))?\s*[:\-]?[ \t]*([^\n]*)"
    ).unwrap();

    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[-/](\d{1,2})[-/](\d{4})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[-/](\d{1,2})[-/](\d{1,2})\b"
    ).unwrap();

    pub static ref DATE_DAY_MONTH_NAME: Regex = Regex::new(
        &format!(r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+{MONTHS}\.?,?\s+(\d{{4}})\b")
    ).unwrap();

    pub static ref DATE_MONTH_NAME_DAY: Regex = Regex::new(
        &format!(r"(?i)\b{MONTHS}\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})\b")
    ).unwrap();

    // VAT rate
    pub static ref VAT_RATE_LABELED: Regex = Regex::new(
        r"(?i)\bVAT\s*(?:rate)?\s*(?:@|:|at)?\s*\(?(\d{1,2}(?:\.\d{1,2})?\s?%)"
    ).unwrap();

    pub static ref RATE_PERCENT: Regex = Regex::new(
        r"\b(\d{1,2}(?:\.\d{1,2})?)\s?%"
    ).unwrap();

    pub static ref RATE_BARE: Regex = Regex::new(
        r"\b(\d{1,2})\b"
    ).unwrap();

    // Amounts
    pub static ref VAT_AMOUNT: Regex = Regex::new(
        &format!(r"(?i)\bVAT\s*(?:amount)?\s*[:=]?\s*(?:AED\s*)?{AMOUNT}")
    ).unwrap();

    pub static ref VAT_AMOUNT_LOOSE: Regex = Regex::new(
        &format!(r"(?i)\bVAT\b([^\n]{{0,40}}?)(?:AED|Dhs|:)\s*{AMOUNT}")
    ).unwrap();

    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        &format!(r"(?i)\btotal\s*(?:amount)?\s*[:=]?\s*(?:AED\s*)?{AMOUNT}")
    ).unwrap();

    pub static ref TOTAL_AMOUNT_LOOSE: Regex = Regex::new(
        &format!(r"(?i)\b(?:grand\s+)?total\b([^\n]{{0,40}}?)(?:AED|Dhs|:)\s*{AMOUNT}")
    ).unwrap();

    // Parties
    pub static ref SUPPLIER: Regex = Regex::new(
        r"(?i)\b(?:supplier|seller|vendor)(?:\s+name)?\s*[:\-]\s*([A-Za-z][A-Za-z0-9 &.,'\-]{1,80})"
    ).unwrap();

    pub static ref SUPPLIER_FROM: Regex = Regex::new(
        r"(?im)^\s*from\s*:\s*([A-Za-z][A-Za-z0-9 &.,'\-]{1,80})"
    ).unwrap();

    pub static ref CUSTOMER: Regex = Regex::new(
        r"(?i)\b(?:customer|buyer|client)(?:\s+name)?\s*[:\-]\s*([A-Za-z][A-Za-z0-9 &.,'\-]{1,80})"
    ).unwrap();

    pub static ref CUSTOMER_BILL_TO: Regex = Regex::new(
        r"(?i)\bbill(?:ed)?\s+to\s*[:\-]?\s*([A-Za-z][A-Za-z0-9 &.,'\-]{1,80})"
    ).unwrap();

    /// Field labels that end a party name captured on a single-line text.
    pub static ref FIELD_LABEL: Regex = Regex::new(
        r"(?i)\s+(?:TRN|tax\s+registration|date|invoice|customer|buyer|client|bill\s+to|supplier|seller|total|VAT|address|tel|phone|email)\b"
    ).unwrap();
}
