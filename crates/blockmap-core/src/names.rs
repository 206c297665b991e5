//! Canonical class/type names.
//!
//! Declared types may carry a parameterization (`uvm_tlm_fifo #(my_item)`,
//! `my_cfg#(8)`) or trailing qualifiers. Registry keys never do.

/// Opens a SystemVerilog parameter list.
pub const PARAMETER_DELIMITER: char = '#';

/// Returns the registry key for a declared type or class name.
///
/// The canonical name is the first whitespace-delimited token, cut before any
/// [`PARAMETER_DELIMITER`]. Blank input yields an empty string.
pub fn canonical_type_name(raw: &str) -> &str {
    let Some(token) = raw.split_whitespace().next() else {
        return "";
    };
    match token.find(PARAMETER_DELIMITER) {
        Some(idx) => &token[..idx],
        None => token,
    }
}
