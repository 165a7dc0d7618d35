use axum::{response::Html, Extension};
use gatehouse_auth::views::escape_html;
use gatehouse_auth::SessionData;

/// The protected landing page reached after sign-in
pub async fn dashboard_page(session: Option<Extension<SessionData>>) -> Html<String> {
    let name = session
        .as_ref()
        .map(|Extension(session)| {
            session
                .display_name
                .clone()
                .unwrap_or_else(|| session.user_id.clone())
        })
        .unwrap_or_else(|| "guest".to_string());

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Dashboard</title>
</head>
<body>
    <header>
        <nav>Dashboard</nav>
        <form method="post" action="/auth/logout">
            <button type="submit">Logout</button>
        </form>
    </header>
    <main>
        <h1>Welcome, {}</h1>
    </main>
</body>
</html>"#,
        escape_html(&name)
    ))
}
