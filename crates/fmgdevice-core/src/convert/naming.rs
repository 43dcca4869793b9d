// Key convention mapping between state (`snake_case`) and the
// FortiManager wire format (`hyphen-case`).

/// `start_port` → `start-port`
pub fn to_api_key(state_key: &str) -> String {
    state_key.replace('_', "-")
}

/// `start-port` → `start_port`
pub fn to_state_key(api_key: &str) -> String {
    api_key.replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renames_both_ways() {
        assert_eq!(to_api_key("multihop_template"), "multihop-template");
        assert_eq!(to_state_key("multihop-template"), "multihop_template");
    }

    #[test]
    fn leaves_plain_names_alone() {
        assert_eq!(to_api_key("name"), "name");
        assert_eq!(to_state_key("name"), "name");
    }
}
