pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{banner, cause_lines, dim, error, info, section, success, summary_row, warn};
pub use progress::{ImportProgressBar, Spinner};
pub use table::{chain_table, stats_table, TableBuilder};
pub use theme::{theme, Theme};
