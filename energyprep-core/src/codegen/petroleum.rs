//! `petroleumShares.js`: share by state plus the fallback constant

use super::{finish, js_key, separator};
use crate::series::ShareTable;

pub const SHARE_EXPORT: &str = "PETROLEUM_SHARE_BY_STATE";
pub const DEFAULT_SHARE_EXPORT: &str = "DEFAULT_PETROLEUM_SHARE";

/// Render the share mapping. Share values keep their original text.
pub fn render_share_module(table: &ShareTable) -> String {
    let mut lines = Vec::with_capacity(table.entries.len() + 4);

    lines.push(format!("export const {SHARE_EXPORT} = {{"));
    for (idx, (state, share)) in table.entries.iter().enumerate() {
        lines.push(format!(
            "  {}: {}{}",
            js_key(state),
            share.text,
            separator(idx, table.entries.len())
        ));
    }
    lines.push("};".to_string());
    lines.push(String::new());
    lines.push(format!(
        "export const {DEFAULT_SHARE_EXPORT} = {};",
        table.default.text
    ));

    finish(lines)
}
