//! Golden vectors for the persisted ACL payload.
//!
//! Records captured by one release are applied by a later one, so the
//! encoding of `PermissionRecord::raw` must stay byte-for-byte stable.

use scope_acl_core::record::{decode_acls, encode_acls};
use scope_acl_core::{AclEntry, AclPermission};

/// A known ACL list and its exact encoding.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    pub name: &'static str,
    pub description: &'static str,
    pub acls: Vec<AclEntry>,
    pub raw: &'static str,
}

/// All golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "empty",
            description: "Scope with no ACL entries",
            acls: vec![],
            raw: "[]",
        },
        GoldenVector {
            name: "single_manage",
            description: "Default creator grant",
            acls: vec![AclEntry::new("admins", AclPermission::Manage)],
            raw: r#"[{"principal":"admins","permission":"MANAGE"}]"#,
        },
        GoldenVector {
            name: "mixed_levels",
            description: "One entry per permission level, order preserved",
            acls: vec![
                AclEntry::new("readers", AclPermission::Read),
                AclEntry::new("writers", AclPermission::Write),
                AclEntry::new("owners", AclPermission::Manage),
            ],
            raw: concat!(
                r#"[{"principal":"readers","permission":"READ"},"#,
                r#"{"principal":"writers","permission":"WRITE"},"#,
                r#"{"principal":"owners","permission":"MANAGE"}]"#,
            ),
        },
        GoldenVector {
            name: "user_principal",
            description: "User principals are emails",
            acls: vec![AclEntry::new("jane.doe@example.com", AclPermission::Read)],
            raw: r#"[{"principal":"jane.doe@example.com","permission":"READ"}]"#,
        },
        GoldenVector {
            name: "escaped_principal",
            description: "Quotes and non-ASCII are JSON-escaped, not mangled",
            acls: vec![AclEntry::new("team \"ops\" ünits", AclPermission::Write)],
            raw: r#"[{"principal":"team \"ops\" ünits","permission":"WRITE"}]"#,
        },
    ]
}

/// Check every vector encodes to its `raw` and decodes back.
pub fn verify_all_vectors() -> Result<(), String> {
    for vector in all_vectors() {
        let encoded = encode_acls(&vector.acls).map_err(|e| format!("{}: {}", vector.name, e))?;
        if encoded != vector.raw {
            return Err(format!(
                "{}: encoded {} but expected {}",
                vector.name, encoded, vector.raw
            ));
        }

        let decoded = decode_acls(vector.raw).map_err(|e| format!("{}: {}", vector.name, e))?;
        if decoded != vector.acls {
            return Err(format!("{}: decoded {:?}", vector.name, decoded));
        }
    }
    Ok(())
}
