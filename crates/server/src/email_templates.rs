//! Plain-text and HTML bodies for status-change emails.

pub struct StatusChangeEmailTemplate<'a> {
    pub monitor_name: &'a str,
    pub url: &'a str,
    pub previous: bool,
    pub current: bool,
    pub error_message: Option<&'a str>,
    pub warnings: &'a [String],
    pub timestamp: String,
    pub daily_limit: i32,
}

impl StatusChangeEmailTemplate<'_> {
    fn label(up: bool) -> &'static str {
        if up { "UP" } else { "DOWN" }
    }

    pub fn render_text(&self) -> String {
        let mut detail = String::new();
        if !self.current
            && let Some(error) = self.error_message
        {
            detail.push_str(&format!("\nError: {error}\n"));
        }
        for warning in self.warnings {
            detail.push_str(&format!("\nWarning: {warning}\n"));
        }

        format!(
            r#"Monitor Status Change

Monitor: {name}
URL: {url}
Status: {previous} -> {current}
{detail}
Time: {timestamp}

You are receiving this because you enabled email notifications. (Limit: {limit}/day)"#,
            name = self.monitor_name,
            url = self.url,
            previous = Self::label(self.previous),
            current = Self::label(self.current),
            detail = detail,
            timestamp = self.timestamp,
            limit = self.daily_limit,
        )
    }

    pub fn render_html(&self) -> String {
        let (bg_color, text_color) = if self.current {
            ("#d4edda", "#155724")
        } else {
            ("#f8d7da", "#721c24")
        };

        let error_section = match self.error_message {
            Some(error) if !self.current => {
                format!("<p><strong>Error:</strong> {error}</p>")
            }
            _ => String::new(),
        };
        let warning_section: String = self
            .warnings
            .iter()
            .map(|warning| format!("<p><strong>Warning:</strong> {warning}</p>"))
            .collect();

        format!(
            r#"<div style="font-family: Arial, sans-serif; padding: 20px; border: 1px solid #ddd; border-radius: 5px;">
    <h2 style="color: {text_color};">Monitor Status Change</h2>
    <p><strong>Monitor:</strong> {name}</p>
    <p><strong>URL:</strong> <a href="{url}">{url}</a></p>
    <p style="background-color: {bg_color}; padding: 10px; border-radius: 3px; color: {text_color};">
        <strong>Status:</strong> {previous} -&gt; {current}
    </p>
    {error_section}
    {warning_section}
    <p>Time: {timestamp}</p>
    <hr>
    <p style="font-size: 12px; color: #888;">You are receiving this because you enabled email notifications. (Limit: {limit}/day)</p>
</div>"#,
            text_color = text_color,
            bg_color = bg_color,
            name = self.monitor_name,
            url = self.url,
            previous = Self::label(self.previous),
            current = Self::label(self.current),
            error_section = error_section,
            warning_section = warning_section,
            timestamp = self.timestamp,
            limit = self.daily_limit,
        )
    }
}
