//! Request headers shared by create and update.

use crate::locator::RecordLocator;

const AUTO_ASSIGN: &str = "Sforce-Auto-Assign";
const DUPLICATE_RULE: &str = "Sforce-Duplicate-Rule-Header";
const MRU: &str = "Sforce-Mru";

/// Write headers for a locator.
///
/// Assignment rules run unless switched off. Duplicate alerts are
/// acknowledged when asked to. MRU tracking is always off.
pub(crate) fn write_headers(locator: &RecordLocator) -> Vec<(String, String)> {
    let mut headers = Vec::with_capacity(3);

    if !locator.auto_assign {
        headers.push((AUTO_ASSIGN.to_string(), "false".to_string()));
    }
    if locator.auto_acknowledge_duplicates {
        headers.push((DUPLICATE_RULE.to_string(), "allowSave=true".to_string()));
    }
    headers.push((MRU.to_string(), "updateMru=false".to_string()));

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(headers: &[(String, String)]) -> Vec<&str> {
        headers.iter().map(|(name, _)| name.as_str()).collect()
    }

    #[test]
    fn test_default_headers() {
        let headers = write_headers(&RecordLocator::new("Lead"));
        assert_eq!(names(&headers), vec![DUPLICATE_RULE, MRU]);
        assert_eq!(headers[1].1, "updateMru=false");
    }

    #[test]
    fn test_auto_assign_off() {
        let mut locator = RecordLocator::new("Lead");
        locator.auto_assign = false;
        locator.auto_acknowledge_duplicates = false;

        let headers = write_headers(&locator);
        assert_eq!(names(&headers), vec![AUTO_ASSIGN, MRU]);
        assert_eq!(headers[0].1, "false");
    }
}
