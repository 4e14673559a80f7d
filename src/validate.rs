//! Pre-submission credential validation.
//!
//! Pure, synchronous shape checks for the login, registration, and
//! password-reset forms. Per-field errors accumulate into a report the
//! UI renders next to each input; nothing here performs I/O, and a form
//! that fails validation is never submitted to the credential service.
//!
//! Lengths are counted in characters, not bytes, so CJK nicknames and
//! passwords measure the way users expect.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::api::{LoginMethod, LoginParams, RegisterParams, ResetPasswordParams};

pub const PASSWORD_MIN_CHARS: usize = 6;
pub const PASSWORD_MAX_CHARS: usize = 20;
pub const NICKNAME_MIN_CHARS: usize = 2;
pub const NICKNAME_MAX_CHARS: usize = 20;
/// Verification codes are exactly this many ASCII digits.
pub const CODE_DIGITS: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
/// Mainland-China mobile numbers: 11 digits, leading `1`, second digit 3-9.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^1[3-9][0-9]{9}$").unwrap());

// ── Field checks ─────────────────────────────────────────────────

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn validate_code(code: &str) -> bool {
    code.len() == CODE_DIGITS && code.bytes().all(|b| b.is_ascii_digit())
}

/// Outcome of a single-field check that carries a message on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCheck {
    pub valid: bool,
    pub message: Option<&'static str>,
}

impl FieldCheck {
    fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    fn fail(message: &'static str) -> Self {
        Self {
            valid: false,
            message: Some(message),
        }
    }
}

pub fn validate_password(password: &str) -> FieldCheck {
    if password.is_empty() {
        return FieldCheck::fail("Password is required");
    }
    let chars = password.chars().count();
    if chars < PASSWORD_MIN_CHARS {
        return FieldCheck::fail("Password must be at least 6 characters");
    }
    if chars > PASSWORD_MAX_CHARS {
        return FieldCheck::fail("Password must be at most 20 characters");
    }
    FieldCheck::ok()
}

/// Nicknames are optional: empty passes, anything else must be 2-20 chars.
pub fn validate_nickname(nickname: &str) -> FieldCheck {
    if nickname.is_empty() {
        return FieldCheck::ok();
    }
    let chars = nickname.chars().count();
    if chars < NICKNAME_MIN_CHARS {
        return FieldCheck::fail("Nickname must be at least 2 characters");
    }
    if chars > NICKNAME_MAX_CHARS {
        return FieldCheck::fail("Nickname must be at most 20 characters");
    }
    FieldCheck::ok()
}

// ── Form reports ─────────────────────────────────────────────────

/// Per-field validation errors for one form submission. The form is
/// valid exactly when no field is flagged.
#[derive(Debug, Default)]
pub struct FormReport {
    pub errors: HashMap<&'static str, &'static str>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn flag(&mut self, field: &'static str, message: &'static str) {
        self.errors.insert(field, message);
    }

    fn check(&mut self, field: &'static str, check: FieldCheck) {
        if let Some(message) = check.message {
            self.flag(field, message);
        }
    }
}

/// Validate a login form according to its method.
///
/// Note the wechat case: a wechat submission carries only the OAuth grant
/// exchanged server-side, so no email/phone/password check runs and the
/// form always validates. Shipped behavior; adding field checks here would
/// reject every wechat sign-in.
pub fn validate_login_form(params: &LoginParams) -> FormReport {
    let mut report = FormReport::default();

    match params.method {
        LoginMethod::Email => {
            match params.email.as_deref() {
                None | Some("") => report.flag("email", "Email is required"),
                Some(email) if !validate_email(email) => {
                    report.flag("email", "Enter a valid email address");
                }
                _ => {}
            }
            report.check(
                "password",
                validate_password(params.password.as_deref().unwrap_or("")),
            );
        }
        LoginMethod::Phone => {
            match params.phone.as_deref() {
                None | Some("") => report.flag("phone", "Phone number is required"),
                Some(phone) if !validate_phone(phone) => {
                    report.flag("phone", "Enter a valid phone number");
                }
                _ => {}
            }
            match params.code.as_deref() {
                None | Some("") => report.flag("code", "Verification code is required"),
                Some(code) if !validate_code(code) => {
                    report.flag("code", "Enter the 6-digit verification code");
                }
                _ => {}
            }
        }
        LoginMethod::Wechat => {}
    }

    report
}

/// Validate a registration form: phone, code, and password are required;
/// nickname and email are optional but shape-checked when present.
pub fn validate_register_form(params: &RegisterParams) -> FormReport {
    let mut report = FormReport::default();

    if params.phone.is_empty() {
        report.flag("phone", "Phone number is required");
    } else if !validate_phone(&params.phone) {
        report.flag("phone", "Enter a valid phone number");
    }

    if params.code.is_empty() {
        report.flag("code", "Verification code is required");
    } else if !validate_code(&params.code) {
        report.flag("code", "Enter the 6-digit verification code");
    }

    report.check("password", validate_password(&params.password));
    report.check(
        "nickname",
        validate_nickname(params.nickname.as_deref().unwrap_or("")),
    );

    if let Some(email) = params.email.as_deref() {
        if !email.is_empty() && !validate_email(email) {
            report.flag("email", "Enter a valid email address");
        }
    }

    report
}

/// Validate a password-reset form: same phone/code rules as registration,
/// with the new password held to the standard password shape.
pub fn validate_reset_password_form(params: &ResetPasswordParams) -> FormReport {
    let mut report = FormReport::default();

    if params.phone.is_empty() {
        report.flag("phone", "Phone number is required");
    } else if !validate_phone(&params.phone) {
        report.flag("phone", "Enter a valid phone number");
    }

    if params.code.is_empty() {
        report.flag("code", "Verification code is required");
    } else if !validate_code(&params.code) {
        report.flag("code", "Enter the 6-digit verification code");
    }

    report.check("newPassword", validate_password(&params.new_password));

    if let Some(email) = params.email.as_deref() {
        if !email.is_empty() && !validate_email(email) {
            report.flag("email", "Enter a valid email address");
        }
    }

    report
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn login(method: LoginMethod) -> LoginParams {
        LoginParams {
            email: None,
            phone: None,
            password: None,
            code: None,
            method,
        }
    }

    fn register() -> RegisterParams {
        RegisterParams {
            email: None,
            phone: "13800138000".into(),
            password: "hunter22".into(),
            code: "123456".into(),
            nickname: None,
        }
    }

    #[test]
    fn email_shapes() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("u.ser+tag@sub.example.cn"));
        assert!(!validate_email("user@example"));
        assert!(!validate_email("user example@x.com"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email(""));
    }

    #[test]
    fn phone_accepts_mainland_mobile_numbers() {
        for prefix in 3..=9 {
            assert!(validate_phone(&format!("1{prefix}812345678")));
        }
    }

    #[test]
    fn phone_rejects_other_eleven_digit_strings() {
        assert!(!validate_phone("12812345678")); // second digit 2
        assert!(!validate_phone("10812345678")); // second digit 0
        assert!(!validate_phone("23812345678")); // leading 2
        assert!(!validate_phone("1381234567")); // 10 digits
        assert!(!validate_phone("138123456789")); // 12 digits
        assert!(!validate_phone("138-1234-567"));
        assert!(!validate_phone(""));
    }

    #[test]
    fn password_boundaries() {
        let empty = validate_password("");
        assert!(!empty.valid);
        assert_eq!(empty.message, Some("Password is required"));

        let short = validate_password("abcde");
        assert!(!short.valid);
        assert_eq!(short.message, Some("Password must be at least 6 characters"));

        let long = validate_password(&"x".repeat(21));
        assert!(!long.valid);
        assert_eq!(long.message, Some("Password must be at most 20 characters"));

        assert!(validate_password("abcdef").valid);
        assert!(validate_password(&"x".repeat(20)).valid);
    }

    #[test]
    fn password_length_counts_characters_not_bytes() {
        // Six CJK chars are 18 bytes but must pass the 6-char minimum.
        assert!(validate_password("密码密码密码").valid);
    }

    #[test]
    fn code_requires_exactly_six_ascii_digits() {
        assert!(validate_code("000000"));
        assert!(validate_code("123456"));
        assert!(!validate_code("12345"));
        assert!(!validate_code("1234567"));
        assert!(!validate_code("12a456"));
        assert!(!validate_code("１２３４５６")); // fullwidth digits
        assert!(!validate_code(""));
    }

    #[test]
    fn nickname_boundaries() {
        assert!(validate_nickname("").valid); // optional field
        assert!(!validate_nickname("x").valid);
        assert!(validate_nickname("xy").valid);
        assert!(validate_nickname(&"x".repeat(20)).valid);
        assert!(!validate_nickname(&"x".repeat(21)).valid);
        assert!(validate_nickname("阿强").valid);
    }

    #[test]
    fn login_email_form_requires_email_and_password() {
        let report = validate_login_form(&login(LoginMethod::Email));
        assert!(!report.is_valid());
        assert_eq!(report.errors["email"], "Email is required");
        assert_eq!(report.errors["password"], "Password is required");

        let report = validate_login_form(&LoginParams {
            email: Some("not-an-email".into()),
            password: Some("hunter22".into()),
            ..login(LoginMethod::Email)
        });
        assert_eq!(report.errors["email"], "Enter a valid email address");
        assert!(!report.errors.contains_key("password"));
    }

    #[test]
    fn login_phone_form_flags_phone_not_code() {
        let report = validate_login_form(&LoginParams {
            phone: Some("".into()),
            code: Some("123456".into()),
            ..login(LoginMethod::Phone)
        });
        assert!(report.errors.contains_key("phone"));
        assert!(!report.errors.contains_key("code"));
        // Phone login never checks a password.
        assert!(!report.errors.contains_key("password"));
    }

    #[test]
    fn login_phone_form_checks_code_shape() {
        let report = validate_login_form(&LoginParams {
            phone: Some("13800138000".into()),
            code: Some("12ab56".into()),
            ..login(LoginMethod::Phone)
        });
        assert_eq!(report.errors["code"], "Enter the 6-digit verification code");
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn login_wechat_form_bypasses_all_field_checks() {
        // Regression guard: the wechat path validates unconditionally,
        // even with an empty password present on the form.
        let report = validate_login_form(&LoginParams {
            password: Some("".into()),
            ..login(LoginMethod::Wechat)
        });
        assert!(report.is_valid());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn register_form_happy_path() {
        assert!(validate_register_form(&register()).is_valid());
    }

    #[test]
    fn register_form_accumulates_field_errors() {
        let report = validate_register_form(&RegisterParams {
            email: Some("nope".into()),
            phone: "12345".into(),
            password: "abc".into(),
            code: "12".into(),
            nickname: Some("x".into()),
        });
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 5);
        assert_eq!(report.errors["phone"], "Enter a valid phone number");
        assert_eq!(report.errors["code"], "Enter the 6-digit verification code");
        assert_eq!(report.errors["password"], "Password must be at least 6 characters");
        assert_eq!(report.errors["nickname"], "Nickname must be at least 2 characters");
        assert_eq!(report.errors["email"], "Enter a valid email address");
    }

    #[test]
    fn register_form_email_is_optional() {
        assert!(validate_register_form(&RegisterParams {
            email: None,
            ..register()
        })
        .is_valid());
        // An empty email counts as absent, not invalid.
        assert!(validate_register_form(&RegisterParams {
            email: Some("".into()),
            ..register()
        })
        .is_valid());
    }

    #[test]
    fn reset_form_checks_new_password_under_wire_name() {
        let report = validate_reset_password_form(&ResetPasswordParams {
            email: None,
            phone: "13800138000".into(),
            code: "123456".into(),
            new_password: "abc".into(),
        });
        assert_eq!(
            report.errors["newPassword"],
            "Password must be at least 6 characters"
        );
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn reset_form_happy_path() {
        assert!(validate_reset_password_form(&ResetPasswordParams {
            email: Some("user@example.com".into()),
            phone: "13800138000".into(),
            code: "654321".into(),
            new_password: "hunter23".into(),
        })
        .is_valid());
    }
}
