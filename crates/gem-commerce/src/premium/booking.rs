//! Consultation and certification bookings.

use crate::ids::{CertificationId, ConsultationId, ProductId};
use serde::{Deserialize, Serialize};

/// What a consultation is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ConsultationKind {
    #[default]
    General,
    EngagementRing,
    CustomDesign,
    Appraisal,
}

impl ConsultationKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ConsultationKind::General => "General",
            ConsultationKind::EngagementRing => "Engagement ring",
            ConsultationKind::CustomDesign => "Custom design",
            ConsultationKind::Appraisal => "Appraisal",
        }
    }

    pub fn all() -> [ConsultationKind; 4] {
        [
            ConsultationKind::General,
            ConsultationKind::EngagementRing,
            ConsultationKind::CustomDesign,
            ConsultationKind::Appraisal,
        ]
    }
}

/// Body of `POST /premium/consultations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationRequest {
    pub kind: ConsultationKind,
    /// ISO-8601 date, e.g. `2026-11-02`.
    pub preferred_date: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A booked consultation as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    #[serde(alias = "_id")]
    pub id: ConsultationId,
    pub kind: ConsultationKind,
    pub preferred_date: String,
    #[serde(default)]
    pub status: String,
}

/// Grading laboratory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CertificationLab {
    #[default]
    Gia,
    Ags,
    Igi,
}

impl CertificationLab {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "GIA" => Some(CertificationLab::Gia),
            "AGS" => Some(CertificationLab::Ags),
            "IGI" => Some(CertificationLab::Igi),
            _ => None,
        }
    }
}

/// Body of `POST /premium/certifications`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationRequest {
    pub product_id: ProductId,
    pub lab: CertificationLab,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Acknowledgement of a certification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationTicket {
    #[serde(alias = "_id")]
    pub id: CertificationId,
    pub product_id: ProductId,
    pub lab: CertificationLab,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consultation_request_wire_shape() {
        let request = ConsultationRequest {
            kind: ConsultationKind::EngagementRing,
            preferred_date: "2026-11-02".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            notes: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "kind": "engagement-ring",
                "preferredDate": "2026-11-02",
                "name": "Ada",
                "email": "ada@example.com"
            })
        );
    }

    #[test]
    fn test_certification_lab_codes() {
        assert_eq!(CertificationLab::from_code("gia"), Some(CertificationLab::Gia));
        assert_eq!(
            serde_json::to_string(&CertificationLab::Ags).unwrap(),
            r#""AGS""#
        );
        assert_eq!(CertificationLab::from_code("xyz"), None);
    }
}
