//! `Link` header rendering.
//!
//! See <https://w3c.github.io/preload/#server-push-http-2>.

use crate::types::ResourceRecord;

/// Render one preload directive.
pub fn preload_directive(record: &ResourceRecord) -> String {
    let mut directive = format!(
        "<{}>; rel=preload; as={}",
        record.path(),
        record.resource_type()
    );
    if record.resource_type().requires_crossorigin() {
        directive.push_str("; crossorigin");
    }
    directive
}

/// Render the `Link` header value for a push set, comma-joined in input order.
///
/// Callers must not pass an empty set.
pub fn build_link(records: &[ResourceRecord]) -> String {
    debug_assert!(!records.is_empty(), "link built for an empty push set");

    records
        .iter()
        .map(preload_directive)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResourceType;

    #[test]
    fn test_single_directive() {
        let record = ResourceRecord::new("/css/app.css", ResourceType::Style, "0123456789ab");
        assert_eq!(build_link(&[record]), "</css/app.css>; rel=preload; as=style");
    }

    #[test]
    fn test_fonts_get_crossorigin() {
        let record = ResourceRecord::new("/fonts/a.woff2", ResourceType::Font, "0123456789ab");
        assert_eq!(
            preload_directive(&record),
            "</fonts/a.woff2>; rel=preload; as=font; crossorigin"
        );
    }

    #[test]
    fn test_multiple_directives_keep_order() {
        let records = vec![
            ResourceRecord::new("/js/app.js", ResourceType::Script, "aaaaaaaaaaaa"),
            ResourceRecord::new("/fonts/a.woff", ResourceType::Font, "bbbbbbbbbbbb"),
            ResourceRecord::new("/images/x.png", ResourceType::Image, "cccccccccccc"),
        ];

        let link = build_link(&records);

        assert_eq!(
            link,
            "</js/app.js>; rel=preload; as=script,\
             </fonts/a.woff>; rel=preload; as=font; crossorigin,\
             </images/x.png>; rel=preload; as=image"
        );
        assert!(!link.ends_with(','));
    }
}
