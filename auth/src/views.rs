use crate::classify::FailureKind;
use crate::validation::{Field, FieldErrors};

/// What the login page should show besides the empty form
#[derive(Debug, Default)]
pub struct LoginView<'a> {
    /// Email to refill after a rejected submission
    pub email: &'a str,
    pub field_errors: Option<&'a FieldErrors>,
    pub failure: Option<FailureKind>,
}

/// Toast text shown for a classified sign-in failure
pub fn failure_message(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::InvalidEmail => "This email is not valid.",
        FailureKind::AccountDisabled => "This user has been disabled.",
        FailureKind::AccountNotFound => "This user was not found.",
        FailureKind::WrongCredential => "Invalid or missing password.",
        FailureKind::Unknown => "The operation could not be completed.",
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn field_error_html(errors: Option<&FieldErrors>, field: Field) -> String {
    match errors.and_then(|errors| errors.get(field)) {
        Some(error) => format!(
            r#"<p class="field-error" id="{}-error">{}</p>"#,
            field.name(),
            escape_html(&error.to_string())
        ),
        None => r#"<p class="field-error">&nbsp;</p>"#.to_string(),
    }
}

/// Login page HTML
pub fn login_page_html(view: &LoginView<'_>) -> String {
    let toast_html = match view.failure {
        Some(kind) => format!(
            r#"<div class="toast toast-destructive" role="alert" data-failure="{}">
            <strong>Error!</strong>
            <span>{}</span>
        </div>"#,
            kind,
            failure_message(kind)
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Sign in</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #f3f4f6;
            display: flex;
            align-items: center;
            justify-content: center;
            min-height: 100vh;
            margin: 0;
        }}
        .login-container {{
            background: white;
            border: 1px solid #e5e7eb;
            border-radius: 6px;
            padding: 32px;
            width: 100%;
            max-width: 420px;
        }}
        h1 {{
            font-size: 24px;
            color: #111827;
            text-align: center;
        }}
        label {{
            display: block;
            font-size: 14px;
            color: #374151;
        }}
        input {{
            width: 100%;
            padding: 10px;
            margin-top: 4px;
            border: 1px solid #d1d5db;
            border-radius: 4px;
            box-sizing: border-box;
        }}
        .field-error {{
            color: #dc2626;
            font-size: 13px;
            margin: 4px 0 12px;
        }}
        .btn {{
            width: 100%;
            padding: 12px;
            border: none;
            border-radius: 4px;
            background: #2563eb;
            color: white;
            font-size: 16px;
            cursor: pointer;
        }}
        .toast {{
            position: fixed;
            top: 16px;
            right: 16px;
            padding: 12px 16px;
            border-radius: 6px;
            display: flex;
            flex-direction: column;
        }}
        .toast-destructive {{
            background: #dc2626;
            color: white;
        }}
    </style>
</head>
<body>
    {toast}
    <div class="login-container">
        <h1>Sign in</h1>
        <form method="post" action="/auth/login" novalidate>
            <label for="email">Email</label>
            <input type="email" id="email" name="email" placeholder="user@email.com" value="{email}">
            {email_error}
            <label for="password">Password</label>
            <input type="password" id="password" name="password" placeholder="******">
            {password_error}
            <button type="submit" class="btn">Continue</button>
        </form>
    </div>
</body>
</html>"#,
        toast = toast_html,
        email = escape_html(view.email),
        email_error = field_error_html(view.field_errors, Field::Email),
        password_error = field_error_html(view.field_errors, Field::Password),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate, RawCredentials};

    #[test]
    fn test_empty_form() {
        let html = login_page_html(&LoginView::default());
        assert!(html.contains(r#"action="/auth/login""#));
        assert!(!html.contains("toast-destructive\""));
        assert!(!html.contains("invalid format"));
    }

    #[test]
    fn test_field_errors_rendered() {
        let errors = validate(&RawCredentials::new("bad", "123")).unwrap_err();
        let html = login_page_html(&LoginView {
            email: "bad",
            field_errors: Some(&errors),
            failure: None,
        });
        assert!(html.contains(r#"id="email-error">invalid format"#));
        assert!(html.contains(r#"id="password-error">too short (min 6)"#));
        assert!(html.contains(r#"value="bad""#));
    }

    #[test]
    fn test_failure_toast_rendered() {
        let html = login_page_html(&LoginView {
            email: "a@b.com",
            field_errors: None,
            failure: Some(FailureKind::AccountDisabled),
        });
        assert!(html.contains(r#"data-failure="account_disabled""#));
        assert!(html.contains("This user has been disabled."));
    }

    #[test]
    fn test_email_is_escaped() {
        let html = login_page_html(&LoginView {
            email: r#""><script>alert(1)</script>"#,
            field_errors: None,
            failure: None,
        });
        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }
}
