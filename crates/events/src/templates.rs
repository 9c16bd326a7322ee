//! HTML email bodies.
//!
//! Every interpolated value is HTML-escaped; offer titles and applicant
//! names come straight from user input.

use portal_core::types::Date;

/// Greeting used for notification recipients other than the offer creator.
pub const GENERIC_RECIPIENT_NAME: &str = "Notification Recipient";

/// Escape the five HTML special characters.
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

fn frame(banner_bg: &str, banner_fg: &str, heading: &str, body: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <div style="background-color: {banner_bg}; padding: 20px; border-radius: 8px; margin-bottom: 20px;">
    <h2 style="color: {banner_fg}; margin: 0;">{heading}</h2>
  </div>
  <div style="padding: 20px; background-color: #ffffff; border: 1px solid #dee2e6; border-radius: 8px;">
{body}
  </div>
</div>"#
    )
}

fn footer(text: &str) -> String {
    format!(
        r#"    <div style="margin-top: 30px; padding-top: 20px; border-top: 1px solid #dee2e6;">
      <p style="color: #6c757d; font-size: 12px; margin: 0;">{text}</p>
    </div>"#
    )
}

/// Sent to the applicant after a successful submission.
pub fn application_confirmation(applicant_name: &str, offer_title: &str, submitted: Date) -> String {
    let body = format!(
        r#"    <p style="color: #495057; font-size: 16px;">Dear <strong>{name}</strong>,</p>
    <p style="color: #495057; font-size: 14px;">Thank you for your application! We have successfully received your submission for:</p>
    <div style="background-color: #e9ecef; padding: 15px; border-radius: 5px; margin: 20px 0;">
      <p style="margin: 5px 0;"><strong>Position:</strong> {title}</p>
      <p style="margin: 5px 0;"><strong>Submitted:</strong> {submitted}</p>
    </div>
    <p style="color: #495057; font-size: 14px;">Our HR team will review your application and contact you if your profile matches our requirements.</p>
    <ul style="color: #495057; font-size: 14px;">
      <li>Your application is now under review</li>
      <li>We will contact you if you are selected for the next stage</li>
      <li>Please keep your contact information up to date</li>
    </ul>
{footer}"#,
        name = escape_html(applicant_name),
        title = escape_html(offer_title),
        submitted = submitted.format("%Y-%m-%d"),
        footer = footer("Best regards,<br>HR Team<br>Job Portal System"),
    );
    frame("#d4edda", "#155724", "Application Submitted Successfully", &body)
}

/// Warning sent one or two days before the deadline.
pub fn upcoming_expiration(
    recipient_name: &str,
    offer_title: &str,
    deadline: Date,
    days_remaining: i64,
) -> String {
    let (bg, fg, border, heading) = if days_remaining <= 1 {
        ("#f8d7da", "#721c24", "#dc3545", "Offer Expiring Tomorrow")
    } else {
        ("#fff3cd", "#856404", "#ffc107", "Offer Expiring in 2 Days")
    };
    let plural = if days_remaining > 1 { "s" } else { "" };
    let body = format!(
        r#"    <p style="color: #495057; font-size: 16px;">Hello <strong>{name}</strong>,</p>
    <p style="color: #495057; font-size: 14px;">Your job offer is approaching its deadline:</p>
    <div style="background-color: {bg}; padding: 15px; border-radius: 5px; margin: 20px 0; border-left: 4px solid {border};">
      <p style="margin: 5px 0;"><strong>Offer:</strong> {title}</p>
      <p style="margin: 5px 0;"><strong>Deadline:</strong> {deadline}</p>
      <p style="margin: 5px 0;"><strong>Time Remaining:</strong> {days_remaining} day{plural}</p>
    </div>
    <ul style="color: #495057; font-size: 14px;">
      <li>Review current applications</li>
      <li>Extend the deadline if you need more candidates</li>
      <li>Prepare for application processing when the offer expires</li>
    </ul>
{footer}"#,
        name = escape_html(recipient_name),
        title = escape_html(offer_title),
        deadline = deadline.format("%Y-%m-%d"),
        footer = footer("This is an automated notification from the HR Job Portal"),
    );
    frame(bg, fg, heading, &body)
}

/// Notice sent once the deadline has passed.
pub fn offer_expired(recipient_name: &str, offer_title: &str, deadline: Date) -> String {
    let body = format!(
        r#"    <p style="color: #495057; font-size: 16px;">Hello <strong>{name}</strong>,</p>
    <p style="color: #495057; font-size: 14px;">Your job offer has reached its deadline and has now expired:</p>
    <div style="background-color: #f8d7da; padding: 15px; border-radius: 5px; margin: 20px 0; border-left: 4px solid #dc3545;">
      <p style="margin: 5px 0;"><strong>Offer:</strong> {title}</p>
      <p style="margin: 5px 0;"><strong>Deadline:</strong> {deadline}</p>
      <p style="margin: 5px 0;"><strong>Status:</strong> Expired</p>
    </div>
    <ul style="color: #495057; font-size: 14px;">
      <li>Review and process any pending applications</li>
      <li>Archive applications within 14 days of the deadline</li>
      <li>Create a new offer if needed</li>
    </ul>
{footer}"#,
        name = escape_html(recipient_name),
        title = escape_html(offer_title),
        deadline = deadline.format("%Y-%m-%d"),
        footer = footer("This is an automated notification from the HR Job Portal"),
    );
    frame("#f8d7da", "#721c24", "Offer Expired", &body)
}

/// Admin-triggered delivery check.
pub fn test_email(message: &str, sender_name: &str, sender_email: &str) -> String {
    let body = format!(
        r#"    <p style="color: #495057; font-size: 16px;">Hello,</p>
    <p style="color: #495057; font-size: 14px;">{message}</p>
{footer}"#,
        message = escape_html(message),
        footer = footer(&format!(
            "This is a test email<br>Sent by: {} ({})",
            escape_html(sender_name),
            escape_html(sender_email)
        )),
    );
    frame("#f8f9fa", "#343a40", "Test Email", &body)
}
