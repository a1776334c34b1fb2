//! Reports pasted or exported from the meter portal.

pub mod confirmation;
pub mod portal;

pub use confirmation::{build_confirmation_sheet, ConfirmationRow};
pub use portal::{extract_client_info, parse_portal_report, summarize, ClientInfo, PortalReport, PortalRow};
