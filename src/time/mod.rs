pub mod advancer;
pub mod dst;
pub mod holidays;
pub mod rules;
pub mod session;

pub use advancer::FedCalendar;
pub use dst::{dst_boundaries, dst_end, dst_start, DstCache};
pub use holidays::{match_fed_holiday, nth_weekday_of_month, observed_date};
pub use rules::{HolidayDef, HolidayIndex, HolidayRule, FED_HOLIDAYS};
pub use session::eastern_date;
