//! HTML pages
//!
//! Small hand-built pages. Every user-supplied value passes through
//! [`escape`] before it reaches the markup.

use common::model::loan::Loan;
use common::model::user::{Role, User};

/// Escape text for use in HTML element content and attribute values
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

/// Login form
pub fn login_page() -> String {
    page(
        "Azar Finance Login",
        "<h2>Azar Finance Login</h2>\n\
         <form method=\"post\" action=\"/\">\n\
         Phone:<br><input name=\"phone\"><br>\n\
         Password:<br><input type=\"password\" name=\"password\"><br><br>\n\
         <button>Login</button>\n\
         </form>\n\
         <a href=\"/signup\">Create account</a>",
    )
}

/// Signup form
///
/// Collector and admin only appear when privileged signup is enabled.
pub fn signup_page(allow_privileged: bool) -> String {
    let roles: &[Role] = if allow_privileged {
        &[Role::Client, Role::Collector, Role::Admin]
    } else {
        &[Role::Client]
    };

    let options: String = roles
        .iter()
        .map(|role| format!("<option value=\"{}\">{}</option>\n", role.as_str(), title_case(role.as_str())))
        .collect();

    page(
        "Azar Finance Signup",
        &format!(
            "<h2>Azar Finance Signup</h2>\n\
             <form method=\"post\" action=\"/signup\">\n\
             Name:<br><input name=\"name\"><br>\n\
             Phone:<br><input name=\"phone\"><br>\n\
             Password:<br><input type=\"password\" name=\"password\"><br>\n\
             Role:\n<select name=\"role\">\n{}</select><br><br>\n\
             <button>Signup</button>\n\
             </form>\n\
             <a href=\"/\">Back to login</a>",
            options
        ),
    )
}

/// Dashboard for a logged-in user
pub fn dashboard_page(user: &User, loans: &[Loan]) -> String {
    let mut body = format!(
        "<h2>{} DASHBOARD</h2>\n<p>Welcome {}</p>\n",
        escape(&user.role.as_str().to_uppercase()),
        escape(&user.name)
    );

    if user.role.can_apply_for_loan() {
        body.push_str(
            "<form method=\"post\" action=\"/apply\">\n\
             Loan Amount: <input name=\"amount\"><br>\n\
             <button>Apply Loan</button>\n\
             </form>\n",
        );
    }

    body.push_str("<h3>Loans</h3>\n<ul>\n");
    for loan in loans {
        if user.role.can_view_all_loans() {
            body.push_str(&format!(
                "<li>{} - {} (user {}, {})</li>\n",
                loan.amount,
                escape(loan.status.as_str()),
                loan.user_id,
                loan.created_at.format("%Y-%m-%d %H:%M")
            ));
        } else {
            body.push_str(&format!("<li>{} - {}</li>\n", loan.amount, escape(loan.status.as_str())));
        }
    }
    body.push_str("</ul>\n<a href=\"/logout\">Logout</a>");

    page("Azar Finance Dashboard", &body)
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
