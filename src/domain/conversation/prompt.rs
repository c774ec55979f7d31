//! Prompt text for the first two messages of every conversation.

use crate::domain::email::InboundEvent;

/// System prompt used when none is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an intelligent email processor. When you receive email notifications:
1. Analyze the email content to understand its purpose
2. Extract relevant information based on the email type
3. Structure the data appropriately for the business API
4. Send the processed data to the API
5. Mark the email as processed

Email types to handle:
- Customer support: Extract issue, urgency, customer details
- Invoices: Extract invoice number, amount, due date, vendor
- Sales inquiries: Extract company, contact, interest level
- General: Categorize and summarize

Always provide structured data that matches the business requirements.";

/// Renders the user message describing a newly received email.
pub fn render_user_turn(event: &InboundEvent) -> String {
    format!(
        "New email received:\nID: {}\nFrom: {}\nSubject: {}\n\nPlease process this email.",
        event.email_id(),
        event.sender_address(),
        event.subject()
    )
}
