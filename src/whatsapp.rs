//! WhatsApp reminder messages: template interpolation and `wa.me` deep links.

use thiserror::Error;

/// Placeholder replaced with the client's name.
pub const CLIENT_NAME_PLACEHOLDER: &str = "{{clientName}}";
/// Placeholder replaced with the amount due.
pub const AMOUNT_DUE_PLACEHOLDER: &str = "{{amountDue}}";

/// Template used until an agency saves its own.
pub const DEFAULT_TEMPLATE: &str = "مرحباً {{clientName}}،\n\
    نذكركم بموعد دفع المبلغ المستحق {{amountDue}} درهم.\n\
    شكراً لتعاونكم.";

const PREVIEW_CLIENT_NAME: &str = "محمد أحمد";
const PREVIEW_AMOUNT_DUE: &str = "500";

const WA_ME_BASE: &str = "https://wa.me/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WhatsAppError {
    #[error("phone number has no digits")]
    MissingPhone,
}

/// Substitutes every placeholder occurrence in `template`.
pub fn render_template(template: &str, client_name: &str, amount_due: &str) -> String {
    template
        .replace(CLIENT_NAME_PLACEHOLDER, client_name)
        .replace(AMOUNT_DUE_PLACEHOLDER, amount_due)
}

/// Renders `template` with sample values for the settings preview.
pub fn preview(template: &str) -> String {
    render_template(template, PREVIEW_CLIENT_NAME, PREVIEW_AMOUNT_DUE)
}

/// Reduces a phone number to the digits expected by `wa.me`.
///
/// `+` and `00` prefixes mark numbers that already carry a country code. A
/// single leading `0` is a local number and gets `default_country_code`.
pub fn normalize_phone(phone: &str, default_country_code: &str) -> Result<String, WhatsAppError> {
    let trimmed = phone.trim();
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();

    let normalized = if trimmed.starts_with('+') {
        digits
    } else if let Some(rest) = digits.strip_prefix("00") {
        rest.to_string()
    } else if let Some(rest) = digits.strip_prefix('0') {
        let country: String = default_country_code
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        format!("{country}{rest}")
    } else {
        digits
    };

    if normalized.is_empty() {
        return Err(WhatsAppError::MissingPhone);
    }
    Ok(normalized)
}

/// Builds `https://wa.me/<phone>?text=<url-encoded message>`.
pub fn build_link(phone_digits: &str, message: &str) -> String {
    format!(
        "{WA_ME_BASE}{phone_digits}?text={}",
        urlencoding::encode(message)
    )
}

/// Renders the template and produces the deep link in one step.
pub fn reminder_link(
    template: &str,
    phone: &str,
    default_country_code: &str,
    client_name: &str,
    amount_due: &str,
) -> Result<String, WhatsAppError> {
    let digits = normalize_phone(phone, default_country_code)?;
    let message = render_template(template, client_name, amount_due);
    Ok(build_link(&digits, &message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_every_placeholder_occurrence() {
        let rendered = render_template(
            "{{clientName}} / {{clientName}} owes {{amountDue}}",
            "Fahd",
            "600",
        );
        assert_eq!(rendered, "Fahd / Fahd owes 600");
    }

    #[test]
    fn unknown_placeholders_are_left_alone() {
        assert_eq!(render_template("Hi {{name}}", "Fahd", "1"), "Hi {{name}}");
    }

    #[test]
    fn preview_uses_sample_values() {
        let text = preview(DEFAULT_TEMPLATE);
        assert!(text.contains("محمد أحمد"));
        assert!(text.contains("500 درهم"));
        assert!(!text.contains("{{"));
    }

    #[test]
    fn local_numbers_get_country_code() {
        assert_eq!(normalize_phone("0512345678", "966").unwrap(), "966512345678");
        assert_eq!(normalize_phone("051-234 5678", "+212").unwrap(), "212512345678");
    }

    #[test]
    fn international_numbers_keep_their_code() {
        assert_eq!(
            normalize_phone("+966 51 234 5678", "212").unwrap(),
            "966512345678"
        );
        assert_eq!(
            normalize_phone("00212612345678", "966").unwrap(),
            "212612345678"
        );
    }

    #[test]
    fn empty_phone_is_rejected() {
        assert_eq!(normalize_phone(" - ", "966"), Err(WhatsAppError::MissingPhone));
    }

    #[test]
    fn link_percent_encodes_the_message() {
        let link = build_link("966512345678", "Hi Fahd & co\n100%");
        assert_eq!(
            link,
            "https://wa.me/966512345678?text=Hi%20Fahd%20%26%20co%0A100%25"
        );
    }

    #[test]
    fn link_encodes_arabic_substitutions_as_utf8() {
        let link =
            reminder_link("مرحباً {{clientName}}", "0512345678", "966", "فهد", "600").unwrap();
        assert!(link.starts_with("https://wa.me/966512345678?text="));
        let encoded = link.split("text=").nth(1).unwrap();
        assert_eq!(urlencoding::decode(encoded).unwrap(), "مرحباً فهد");
        assert!(!encoded.contains(' '));
    }
}
