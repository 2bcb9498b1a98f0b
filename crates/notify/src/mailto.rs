use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::ReportMessage;

/// Everything but RFC 3986 unreserved characters.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const ADDRESS: &AsciiSet = &COMPONENT.remove(b'@');

/// Builds a `mailto:` link that opens the report in a local mail client.
///
/// Components are percent-encoded per RFC 6068; body line breaks are sent
/// as CRLF.
#[must_use]
pub fn mailto_url(email: &str, message: &ReportMessage) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        utf8_percent_encode(email.trim(), ADDRESS),
        utf8_percent_encode(&message.subject, COMPONENT),
        utf8_percent_encode(&message.text.replace('\n', "\r\n"), COMPONENT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_subject_and_body() {
        let message = ReportMessage {
            subject: "Bill Split: Tea & cake (2026-01-01)".to_string(),
            text: "Hello Ama,\nTotal: LKR 1,000.00".to_string(),
            html: String::new(),
        };

        assert_eq!(
            mailto_url(" ama+bills@example.lk ", &message),
            "mailto:ama%2Bbills@example.lk\
             ?subject=Bill%20Split%3A%20Tea%20%26%20cake%20%282026-01-01%29\
             &body=Hello%20Ama%2C%0D%0ATotal%3A%20LKR%201%2C000.00"
        );
    }

    #[test]
    fn encodes_utf8_bytes() {
        let message = ReportMessage {
            subject: "Café ~ 50%".to_string(),
            text: "ok".to_string(),
            html: String::new(),
        };

        assert_eq!(
            mailto_url("séna@example.lk", &message),
            "mailto:s%C3%A9na@example.lk?subject=Caf%C3%A9%20~%2050%25&body=ok"
        );
    }
}
