//! Bidirectional mapping between internal account records and SCIM User
//! resources.
//!
//! Outbound, every resource carries the same constant envelope (core User
//! schema URN, `locale: "en-US"`, empty `groups`, `meta.resourceType:
//! "User"`) and derives its name components by splitting the stored display
//! name on the first whitespace run. Inbound, create and replace share one
//! mapping: the display name is synthesized from the name components with
//! the literal fallbacks `"NAME"` and `"MISSING"`, and the account email
//! is the first entry of `emails` marked primary. The fallback literals are
//! deliberately conspicuous; an account provisioned without a name reads
//! `NAME MISSING` wherever the display name is shown.

use log::warn;
use uuid::Uuid;

use crate::error::ScimError;
use crate::model::{AccountRecord, AccountUpdate, NewAccount};
use crate::scim::SCHEMA_USER;
use crate::scim::types::{Meta, RoleRef, ScimEmail, ScimName, ScimUser};

/// Fallback given name when the inbound payload carries none.
const DEFAULT_GIVEN_NAME: &str = "NAME";

/// Fallback family name when the inbound payload carries none.
const DEFAULT_FAMILY_NAME: &str = "MISSING";

/// Locale stamped on every outbound User resource.
const USER_LOCALE: &str = "en-US";

/// Split a display name into `(given, family)` on the first whitespace run.
///
/// The given name is everything before the first whitespace character, the
/// family name is everything after the run, and a name without whitespace
/// has an empty family name.
///
/// # Examples
///
/// ```
/// use scim_provision::scim::mapper::split_display_name;
///
/// assert_eq!(split_display_name("Ada Lovelace"), ("Ada".into(), "Lovelace".into()));
/// assert_eq!(split_display_name("Ada  Byron King"), ("Ada".into(), "Byron King".into()));
/// assert_eq!(split_display_name("Cher"), ("Cher".into(), String::new()));
/// ```
pub fn split_display_name(display_name: &str) -> (String, String) {
    match display_name.find(char::is_whitespace) {
        Some(split_at) => (
            display_name[..split_at].to_string(),
            display_name[split_at..].trim_start().to_string(),
        ),
        None => (display_name.to_string(), String::new()),
    }
}

/// Project an account record into the outbound SCIM User resource.
pub fn user_resource(record: &AccountRecord) -> ScimUser {
    let (given_name, family_name) = split_display_name(&record.display_name);

    ScimUser {
        schemas: vec![SCHEMA_USER.to_string()],
        id: Some(record.id.to_string()),
        user_name: Some(record.email.clone()),
        name: Some(ScimName {
            given_name: Some(given_name),
            family_name: Some(family_name),
        }),
        emails: vec![ScimEmail {
            value: record.email.clone(),
            email_type: Some("work".to_string()),
            primary: true,
        }],
        display_name: Some(record.display_name.clone()),
        locale: Some(USER_LOCALE.to_string()),
        external_id: record.external_id.clone(),
        groups: Vec::new(),
        password: None,
        active: Some(record.active),
        roles: Some(
            record
                .roles
                .iter()
                .map(|role| RoleRef {
                    value: role.id.to_string(),
                    display: Some(role.name.clone()),
                })
                .collect(),
        ),
        meta: Some(Meta {
            resource_type: "User".to_string(),
            location: None,
        }),
    }
}

/// Map an inbound create payload to a [`NewAccount`] for the given tenant.
///
/// # Errors
///
/// Returns [`ScimError::InvalidValue`] when no email entry is marked
/// primary.
pub fn new_account(payload: &ScimUser, tenant_id: Uuid) -> Result<NewAccount, ScimError> {
    Ok(NewAccount {
        tenant_id,
        external_id: payload.external_id.clone(),
        email: primary_email(payload)?,
        display_name: synthesized_display_name(payload),
        active: payload.active.unwrap_or(false),
        password: payload.password.clone(),
        role_ids: role_ids(payload),
    })
}

/// Map an inbound replace payload to the attribute overwrite it implies:
/// email, display name, and the full role set. Everything else on the
/// account is left as stored.
///
/// # Errors
///
/// Returns [`ScimError::InvalidValue`] when no email entry is marked
/// primary.
pub fn replacement(payload: &ScimUser) -> Result<AccountUpdate, ScimError> {
    Ok(AccountUpdate {
        email: Some(primary_email(payload)?),
        display_name: Some(synthesized_display_name(payload)),
        role_ids: Some(role_ids(payload)),
        active: None,
    })
}

/// The value of the first inbound email marked `primary: true`.
fn primary_email(payload: &ScimUser) -> Result<String, ScimError> {
    payload
        .emails
        .iter()
        .find(|email| email.primary)
        .map(|email| email.value.clone())
        .ok_or_else(|| ScimError::invalid_value("User payload has no primary email"))
}

/// Join the inbound name components, filling absent parts with the fixed
/// placeholder literals.
fn synthesized_display_name(payload: &ScimUser) -> String {
    let name = payload.name.as_ref();
    let given = name
        .and_then(|name| name.given_name.as_deref())
        .unwrap_or(DEFAULT_GIVEN_NAME);
    let family = name
        .and_then(|name| name.family_name.as_deref())
        .unwrap_or(DEFAULT_FAMILY_NAME);
    format!("{given} {family}")
}

/// Role ids referenced by the payload. Values that are not UUIDs are
/// skipped; existence against the role table is the store's concern.
fn role_ids(payload: &ScimUser) -> Vec<Uuid> {
    payload
        .roles
        .iter()
        .flatten()
        .filter_map(|role| match role.value.parse::<Uuid>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("Skipping unparseable role reference {:?}", role.value);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use chrono::Utc;
    use serde_json::json;

    fn record() -> AccountRecord {
        AccountRecord {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            external_id: Some("okta-7".to_string()),
            email: "ada@acme.test".to_string(),
            display_name: "Ada Lovelace".to_string(),
            active: true,
            roles: vec![Role {
                id: Uuid::new_v4(),
                name: "Admin".to_string(),
            }],
            created_at: Utc::now(),
        }
    }

    fn payload(value: serde_json::Value) -> ScimUser {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn outbound_resource_carries_the_full_envelope() {
        let record = record();
        let user = user_resource(&record);

        assert_eq!(
            user.schemas,
            vec!["urn:ietf:params:scim:schemas:core:2.0:User".to_string()]
        );
        assert_eq!(user.id.as_deref(), Some(record.id.to_string().as_str()));
        assert_eq!(user.user_name.as_deref(), Some("ada@acme.test"));
        assert_eq!(user.locale.as_deref(), Some("en-US"));
        assert_eq!(user.active, Some(true));
        assert!(user.groups.is_empty());
        assert_eq!(user.meta.unwrap().resource_type, "User");

        let name = user.name.unwrap();
        assert_eq!(name.given_name.as_deref(), Some("Ada"));
        assert_eq!(name.family_name.as_deref(), Some("Lovelace"));

        assert_eq!(user.emails.len(), 1);
        assert!(user.emails[0].primary);
        assert_eq!(user.emails[0].email_type.as_deref(), Some("work"));

        let roles = user.roles.unwrap();
        assert_eq!(roles[0].value, record.roles[0].id.to_string());
        assert_eq!(roles[0].display.as_deref(), Some("Admin"));
    }

    #[test]
    fn single_token_display_name_has_empty_family_name() {
        let mut record = record();
        record.display_name = "Cher".to_string();
        let name = user_resource(&record).name.unwrap();
        assert_eq!(name.given_name.as_deref(), Some("Cher"));
        assert_eq!(name.family_name.as_deref(), Some(""));
    }

    #[test]
    fn inbound_name_defaults_fill_missing_components() {
        let tenant_id = Uuid::new_v4();

        let full = payload(json!({
            "name": {"givenName": "Grace", "familyName": "Hopper"},
            "emails": [{"value": "grace@acme.test", "primary": true}]
        }));
        assert_eq!(
            new_account(&full, tenant_id).unwrap().display_name,
            "Grace Hopper"
        );

        let missing_family = payload(json!({
            "name": {"givenName": "Grace"},
            "emails": [{"value": "grace@acme.test", "primary": true}]
        }));
        assert_eq!(
            new_account(&missing_family, tenant_id).unwrap().display_name,
            "Grace MISSING"
        );

        let nameless = payload(json!({
            "emails": [{"value": "grace@acme.test", "primary": true}]
        }));
        assert_eq!(
            new_account(&nameless, tenant_id).unwrap().display_name,
            "NAME MISSING"
        );
    }

    #[test]
    fn inbound_takes_the_first_primary_email() {
        let user = payload(json!({
            "emails": [
                {"value": "secondary@acme.test", "primary": false},
                {"value": "first@acme.test", "primary": true},
                {"value": "second@acme.test", "primary": true}
            ]
        }));
        let account = new_account(&user, Uuid::new_v4()).unwrap();
        assert_eq!(account.email, "first@acme.test");
    }

    #[test]
    fn missing_primary_email_is_invalid_value() {
        let user = payload(json!({
            "emails": [{"value": "a@acme.test", "primary": false}]
        }));
        let err = new_account(&user, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.status(), 400);
        assert!(matches!(err, ScimError::InvalidValue { .. }));

        let err = replacement(&user).unwrap_err();
        assert!(matches!(err, ScimError::InvalidValue { .. }));
    }

    #[test]
    fn inbound_active_defaults_to_false_on_create_only() {
        let user = payload(json!({
            "emails": [{"value": "a@acme.test", "primary": true}]
        }));
        assert!(!new_account(&user, Uuid::new_v4()).unwrap().active);
        assert_eq!(replacement(&user).unwrap().active, None);
    }

    #[test]
    fn role_references_parse_and_skip_garbage() {
        let admin = Uuid::new_v4();
        let user = payload(json!({
            "emails": [{"value": "a@acme.test", "primary": true}],
            "roles": [
                {"value": admin.to_string()},
                {"value": "17"},
                {"value": "not-a-uuid"}
            ]
        }));
        assert_eq!(new_account(&user, Uuid::new_v4()).unwrap().role_ids, vec![admin]);
    }

    #[test]
    fn replacement_overwrites_email_name_and_roles_only() {
        let user = payload(json!({
            "name": {"givenName": "New", "familyName": "Name"},
            "emails": [{"value": "new@acme.test", "primary": true}],
            "active": false,
            "externalId": "changed"
        }));
        let update = replacement(&user).unwrap();
        assert_eq!(update.email.as_deref(), Some("new@acme.test"));
        assert_eq!(update.display_name.as_deref(), Some("New Name"));
        assert_eq!(update.role_ids, Some(Vec::new()));
        // Replace never touches the provisioning flag.
        assert_eq!(update.active, None);
    }
}
