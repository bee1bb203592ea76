// Copyright 2026 The OmniCare Project
// SPDX-License-Identifier: Apache-2.0

// Pre-flight validation.
//
// Runs to completion before any other component is invoked. Pure: no
// network, no I/O. The caller is responsible for logging rejections
// (tagged with the patient identifier) and mapping them to HTTP 400.

use crate::query::MedicalQuery;

/// Why a query was rejected before reaching the analysis engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsentViolation {
    #[error("explicit patient consent is required before medical data is processed")]
    MissingConsent,

    #[error("the symptom description must not be empty")]
    EmptySymptoms,
}

/// Validate a query before any outbound call is attempted.
///
/// Consent is checked first: a query without consent is rejected even if
/// every other field is also invalid.
pub fn validate(query: &MedicalQuery) -> Result<(), ConsentViolation> {
    if !query.consent_provided {
        return Err(ConsentViolation::MissingConsent);
    }

    if query.symptoms.trim().is_empty() {
        return Err(ConsentViolation::EmptySymptoms);
    }

    Ok(())
}
