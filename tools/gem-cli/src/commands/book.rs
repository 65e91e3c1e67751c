//! Consultation and certification bookings.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use gem_commerce::premium::{
    CertificationLab, CertificationRequest, ConsultationKind, ConsultationRequest,
};
use gem_commerce::prelude::{PremiumApi, ProductId};

use super::{BookArgs, BookCommand};
use crate::context::Context;

/// Run the book command.
pub async fn run(args: BookArgs, ctx: &Context) -> Result<()> {
    match args.command {
        BookCommand::Consultation {
            kind,
            date,
            name,
            email,
            phone,
            notes,
        } => {
            let request = consultation_request(&kind, &date, name, email, phone, notes)?;
            book_consultation(request, ctx).await
        }
        BookCommand::Certification {
            product_id,
            lab,
            notes,
        } => {
            let request = certification_request(&product_id, &lab, notes)?;
            request_certification(request, ctx).await
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check and assemble a consultation booking.
pub fn consultation_request(
    kind: &str,
    date: &str,
    name: String,
    email: String,
    phone: Option<String>,
    notes: Option<String>,
) -> Result<ConsultationRequest> {
    let Some(kind) = parse_kind(kind) else {
        let known: Vec<String> = ConsultationKind::all()
            .iter()
            .filter_map(|k| serde_json::to_value(k).ok())
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        bail!("Unknown consultation kind {} (expected one of: {})", kind, known.join(", "));
    };
    let date = date.trim();
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        bail!("Preferred date must be YYYY-MM-DD, got: {}", date);
    }
    let (name, email) = (name.trim().to_string(), email.trim().to_string());
    if name.is_empty() || email.is_empty() {
        bail!("Name and email are required");
    }

    Ok(ConsultationRequest {
        kind,
        preferred_date: date.to_string(),
        name,
        email,
        phone: non_blank(phone),
        notes: non_blank(notes),
    })
}

fn parse_kind(kind: &str) -> Option<ConsultationKind> {
    let slug = kind.trim().to_lowercase().replace([' ', '_'], "-");
    serde_json::from_value(serde_json::Value::String(slug)).ok()
}

/// Check and assemble a certification request.
pub fn certification_request(
    product_id: &str,
    lab: &str,
    notes: Option<String>,
) -> Result<CertificationRequest> {
    let Some(lab) = CertificationLab::from_code(lab.trim()) else {
        bail!("Unknown lab {} (expected GIA, AGS or IGI)", lab);
    };
    if product_id.trim().is_empty() {
        bail!("Product ID is required");
    }
    Ok(CertificationRequest {
        product_id: ProductId::new(product_id.trim()),
        lab,
        notes: non_blank(notes),
    })
}

async fn book_consultation(request: ConsultationRequest, ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let spinner = ctx.output.spinner("Booking consultation...");
    let result = api.book_consultation(&request).await;
    spinner.finish_and_clear();
    let booking = result?;

    if ctx.output.is_json() {
        ctx.output.json(&booking);
        return Ok(());
    }
    ctx.output.success(&format!(
        "{} consultation requested for {}",
        booking.kind.display_name(),
        booking.preferred_date
    ));
    ctx.output.kv("Booking", booking.id.as_str());
    if !booking.status.is_empty() {
        ctx.output.kv("Status", &booking.status);
    }
    Ok(())
}

async fn request_certification(request: CertificationRequest, ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let spinner = ctx.output.spinner("Requesting certification...");
    let result = api.request_certification(&request).await;
    spinner.finish_and_clear();
    let ticket = result?;

    if ctx.output.is_json() {
        ctx.output.json(&ticket);
        return Ok(());
    }
    ctx.output.success(&format!(
        "Certification requested for {}",
        ticket.product_id
    ));
    ctx.output.kv("Ticket", ticket.id.as_str());
    if !ticket.status.is_empty() {
        ctx.output.kv("Status", &ticket.status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consultation_request() {
        let request = consultation_request(
            "Engagement Ring",
            "2026-11-02",
            " Ada ".to_string(),
            "ada@example.com".to_string(),
            Some("  ".to_string()),
            Some("Oval cut".to_string()),
        )
        .unwrap();
        assert_eq!(request.kind, ConsultationKind::EngagementRing);
        assert_eq!(request.name, "Ada");
        assert!(request.phone.is_none());
        assert_eq!(request.notes.as_deref(), Some("Oval cut"));
    }

    #[test]
    fn test_consultation_rejects_bad_input() {
        let bad_date = consultation_request(
            "general",
            "next tuesday",
            "Ada".to_string(),
            "ada@example.com".to_string(),
            None,
            None,
        );
        assert!(bad_date.is_err());

        let bad_kind = consultation_request(
            "repair",
            "2026-11-02",
            "Ada".to_string(),
            "ada@example.com".to_string(),
            None,
            None,
        )
        .unwrap_err();
        assert!(bad_kind.to_string().contains("custom-design"));
    }

    #[test]
    fn test_certification_request() {
        let request = certification_request("ring-1", "igi", None).unwrap();
        assert_eq!(request.lab, CertificationLab::Igi);
        assert!(certification_request("ring-1", "XYZ", None).is_err());
        assert!(certification_request(" ", "GIA", None).is_err());
    }
}
