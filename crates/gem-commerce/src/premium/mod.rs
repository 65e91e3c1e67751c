//! Premium add-on services: gift packaging, insurance, consultations and
//! certifications.

mod booking;
mod options;

pub use booking::{
    CertificationLab, CertificationRequest, CertificationTicket, Consultation, ConsultationKind,
    ConsultationRequest,
};
pub use options::{InsuranceOption, PackagingOption, PremiumSelections};
