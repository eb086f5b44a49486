//! Admission adapter
//!
//! Runs Default then Validate on a manifest and turns a rejection into the
//! Kubernetes `Status` an API server returns for an invalid object: code
//! 422, reason `Invalid` and one cause per field error.

use crate::manifest::{Manifest, ManifestError};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{Status, StatusCause, StatusDetails};
use nodesmith_domain::{Compiler, FieldError, ValidationError};
use tracing::{info, warn};

pub const STATUS_INVALID: i32 = 422;

/// Outcome of an admission request
#[derive(Debug, Clone)]
pub enum Admission {
    /// Defaulted manifest, passed on unchanged
    Allowed(Manifest),
    Denied(Status),
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed(_))
    }
}

/// Admits `manifest`, comparing against `old` on update.
///
/// Validation failures become [`Admission::Denied`]; anything else (bad
/// documents, kind changes) is returned as an error.
pub fn review(
    compiler: &Compiler,
    manifest: Manifest,
    old: Option<&Manifest>,
) -> Result<Admission, ManifestError> {
    let kind = manifest.kind();
    let name = manifest.name();

    match manifest.admit(compiler, old) {
        Ok(admitted) => {
            info!(%kind, %name, "Manifest admitted");
            Ok(Admission::Allowed(admitted))
        }
        Err(ManifestError::Rejected(rejection)) => {
            warn!(%kind, %name, errors = rejection.errors.len(), "Manifest rejected");
            Ok(Admission::Denied(rejection_status(&kind, &name, &rejection)))
        }
        Err(err) => Err(err),
    }
}

pub fn rejection_status(kind: &str, name: &str, rejection: &ValidationError) -> Status {
    let details = rejection
        .errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    Status {
        status: Some("Failure".to_string()),
        code: Some(STATUS_INVALID),
        reason: Some("Invalid".to_string()),
        message: Some(format!("{kind} \"{name}\" is invalid: [{details}]")),
        details: Some(StatusDetails {
            kind: Some(kind.to_string()),
            name: Some(name.to_string()),
            causes: Some(rejection.errors.iter().map(status_cause).collect()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn status_cause(error: &FieldError) -> StatusCause {
    StatusCause {
        field: Some(error.path.to_string()),
        message: Some(error.detail()),
        reason: Some(error.kind.reason().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRYSM_WITH_REST: &str = r#"
apiVersion: ethereum2.nodesmith.io/v1alpha1
kind: BeaconNode
metadata:
  name: prysm
spec:
  client: prysm
  network: mainnet
  rest: true
"#;

    #[test]
    fn test_valid_manifest_is_allowed_defaulted() {
        let manifest = Manifest::parse(
            "apiVersion: near.nodesmith.io/v1alpha1\nkind: Node\nmetadata:\n  name: near\nspec:\n  network: testnet\n",
        )
        .unwrap();

        let admission = review(&Compiler::default(), manifest, None).unwrap();
        let Admission::Allowed(Manifest::NearNode(node)) = admission else {
            panic!("expected the near node to be allowed");
        };
        assert_eq!(node.spec.p2p_port, Some(24567));
    }

    #[test]
    fn test_rejection_becomes_invalid_status_with_causes() {
        let manifest = Manifest::parse(PRYSM_WITH_REST).unwrap();

        let admission = review(&Compiler::default(), manifest, None).unwrap();
        let Admission::Denied(status) = admission else {
            panic!("expected prysm with rest to be denied");
        };

        assert_eq!(status.code, Some(STATUS_INVALID));
        assert_eq!(status.reason.as_deref(), Some("Invalid"));
        let causes = status.details.unwrap().causes.unwrap();
        assert_eq!(causes.len(), 1);
        assert_eq!(causes[0].field.as_deref(), Some("spec.rest"));
        assert_eq!(causes[0].reason.as_deref(), Some("FieldValueInvalid"));
        assert_eq!(
            causes[0].message.as_deref(),
            Some("Invalid value: true: not supported by prysm client")
        );
    }
}
