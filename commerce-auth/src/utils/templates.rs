//! Rendered email bodies for the notifier.
//!
//! The core hands the notifier fully rendered content; templates know
//! nothing about transport.

/// OTP mail sent right after self-registration.
pub fn registration_otp_email(otp: &str, ttl_minutes: i64) -> (String, String) {
    let subject = "Account Verification".to_string();
    let html = format!(
        r#"<body style="font-family: Arial, sans-serif; color: #333; margin: 0; padding: 0; background-color: #f0f0f0;">
    <div style="max-width: 570px; margin: 0 auto; padding: 20px; border-radius: 15px; background-color: #ffffff;">
        <p>Hey,</p>
        <p>Thanks for registering with us.</p>
        <p>Your One-Time Password (OTP) is:</p>
        <div style="text-align: center; padding: 20px; font-size: 36px; font-weight: bold; color: #ffffff; background-color: #007bff; border-radius: 15px;">{otp}</div>
        <p>This OTP is valid for the next {ttl_minutes} minutes. If you did not request this OTP, just ignore this message.</p>
        <p style="font-size: 12px; color: #999; text-align: center;">This is an automated message, please do not reply to this email.</p>
    </div>
</body>"#
    );
    (subject, html)
}

/// OTP mail for resend-confirmation and password-reset requests.
pub fn otp_request_email(otp: &str, ttl_minutes: i64) -> (String, String) {
    let subject = "Your Secure OTP for Verification".to_string();
    let html = format!(
        r#"<body style="font-family: Arial, sans-serif; color: #333; margin: 0; padding: 0; background-color: #f0f0f0;">
    <div style="max-width: 570px; margin: 0 auto; padding: 20px; border-radius: 15px; background-color: #ffffff;">
        <p>Hey,</p>
        <p>Your One-Time Password (OTP) is:</p>
        <div style="text-align: center; padding: 20px; font-size: 36px; font-weight: bold; color: #007bff; background-color: #e0e0e0; border-radius: 15px;">{otp}</div>
        <p>This OTP is valid for the next {ttl_minutes} minutes. If you did not request this OTP, just ignore this message.</p>
        <p style="font-size: 12px; color: #999; text-align: center;">This is an automated message, please do not reply to this email.</p>
    </div>
</body>"#
    );
    (subject, html)
}

/// Invitation mail for admin-created dashboard accounts, carrying the
/// generated temporary password.
pub fn dashboard_invite_email(temp_password: &str, role: &str) -> (String, String) {
    let subject = format!("Invitation for {}", role);
    let html = format!(
        r#"<body style="font-family: Arial, sans-serif; color: #333; margin: 0; padding: 0; background-color: #f0f0f0;">
    <div style="max-width: 570px; margin: 0 auto; padding: 20px; border-radius: 15px; background-color: #ffffff;">
        <p>Hey,</p>
        <p>You are invited as {role} to our platform.</p>
        <p>You need to verify your email address before login.</p>
        <p>Here is the password you can use to log in after email verification: <strong>{temp_password}</strong></p>
        <p>Note: Please change your password after email verification.</p>
        <p style="font-size: 12px; color: #999; text-align: center;">This is an automated message, please do not reply to this email.</p>
    </div>
</body>"#
    );
    (subject, html)
}
