//! # Registration
//!
//! The account-creation form and the multipart field list it turns into.
//!
//! ## Field Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Form field               Buyer part            Vendor part            │
//! │  ──────────               ──────────            ───────────            │
//! │  name                     name                                         │
//! │  surname                  surname                                      │
//! │  phone                    phone                                        │
//! │  birth_date               birth_date                                   │
//! │  description              description                                  │
//! │  metiz_name                                     name                   │
//! │  contact_metiz_name                             contact_person_name    │
//! │  registration_number                            registration_number    │
//! │  metiz_phone                                    phone                  │
//! │  metiz_description                              description            │
//! │  address                                        address                │
//! │  email, password          email, password       email, password        │
//! │  photo (optional)         photo                 photo                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::auth::Role;
use crate::validation::{
    validate_email, validate_image_type, validate_max_len, validate_password_confirmation,
    validate_phone, validate_required, ValidationResult, MAX_DESCRIPTION_LEN,
};

// =============================================================================
// Form Parts
// =============================================================================

/// Login credentials entered twice on the registration form.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Profile of a buyer account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BuyerProfile {
    pub name: String,
    pub surname: String,
    pub phone: String,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub birth_date: Option<NaiveDate>,

    #[serde(default)]
    pub description: String,
}

/// Profile of a vendor ("metiz") account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VendorProfile {
    pub metiz_name: String,
    pub contact_metiz_name: String,
    pub registration_number: String,
    pub metiz_phone: String,
    pub address: String,

    #[serde(default)]
    pub metiz_description: String,
}

/// Role-specific half of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationProfile {
    Buyer(BuyerProfile),
    Vendor(VendorProfile),
}

impl RegistrationProfile {
    pub fn role(&self) -> Role {
        match self {
            RegistrationProfile::Buyer(_) => Role::Buyer,
            RegistrationProfile::Vendor(_) => Role::Vendor,
        }
    }
}

/// A photo picked for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for PhotoUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

// =============================================================================
// Registration Form
// =============================================================================

/// The whole registration form as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub credentials: Credentials,
    pub profile: RegistrationProfile,
    pub photo: Option<PhotoUpload>,
}

impl RegistrationForm {
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    /// Checks the form before anything is sent.
    ///
    /// ## Order
    /// 1. Password equals its confirmation
    /// 2. Email
    /// 3. Role-specific required fields
    /// 4. Photo content type
    pub fn validate(&self) -> ValidationResult<()> {
        let creds = &self.credentials;
        validate_password_confirmation(&creds.password, &creds.confirm_password)?;
        validate_email(&creds.email)?;

        match &self.profile {
            RegistrationProfile::Buyer(buyer) => {
                validate_required("name", &buyer.name)?;
                validate_required("surname", &buyer.surname)?;
                validate_phone("phone", &buyer.phone)?;
                validate_max_len("description", &buyer.description, MAX_DESCRIPTION_LEN)?;
            }
            RegistrationProfile::Vendor(vendor) => {
                validate_required("metizName", &vendor.metiz_name)?;
                validate_required("contactMetizName", &vendor.contact_metiz_name)?;
                validate_required("registrationNumber", &vendor.registration_number)?;
                validate_phone("metizPhone", &vendor.metiz_phone)?;
                validate_required("address", &vendor.address)?;
                validate_max_len(
                    "metizDescription",
                    &vendor.metiz_description,
                    MAX_DESCRIPTION_LEN,
                )?;
            }
        }

        if let Some(photo) = &self.photo {
            validate_image_type(&photo.content_type)?;
        }

        Ok(())
    }

    /// Validates the form and flattens it into the multipart field list the
    /// backend expects for its role.
    pub fn into_payload(self) -> ValidationResult<RegistrationPayload> {
        self.validate()?;

        let role = self.role();
        let mut fields: Vec<(&'static str, String)> = match self.profile {
            RegistrationProfile::Buyer(buyer) => vec![
                ("name", buyer.name.trim().to_string()),
                ("surname", buyer.surname.trim().to_string()),
                ("phone", buyer.phone.trim().to_string()),
                (
                    "birth_date",
                    buyer
                        .birth_date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                ),
                ("description", buyer.description),
            ],
            RegistrationProfile::Vendor(vendor) => vec![
                ("name", vendor.metiz_name.trim().to_string()),
                (
                    "contact_person_name",
                    vendor.contact_metiz_name.trim().to_string(),
                ),
                (
                    "registration_number",
                    vendor.registration_number.trim().to_string(),
                ),
                ("phone", vendor.metiz_phone.trim().to_string()),
                ("description", vendor.metiz_description),
                ("address", vendor.address.trim().to_string()),
            ],
        };

        fields.push(("email", self.credentials.email.trim().to_string()));
        fields.push(("password", self.credentials.password));

        Ok(RegistrationPayload {
            role,
            fields,
            photo: self.photo,
        })
    }
}

// =============================================================================
// Registration Payload
// =============================================================================

/// Validated text parts plus the optional photo part, ready to post.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationPayload {
    pub role: Role,
    pub fields: Vec<(&'static str, String)>,
    pub photo: Option<PhotoUpload>,
}

impl RegistrationPayload {
    /// Value of a text part.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Endpoint this payload is posted to.
    pub fn path(&self) -> &'static str {
        self.role.registration_path()
    }
}

impl fmt::Debug for RegistrationPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.fields.iter().map(|(key, _)| *key).collect();
        f.debug_struct("RegistrationPayload")
            .field("role", &self.role)
            .field("fields", &names)
            .field("photo", &self.photo)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn credentials(password: &str, confirm: &str) -> Credentials {
        Credentials {
            email: "anna@example.ru".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    fn buyer_form() -> RegistrationForm {
        RegistrationForm {
            credentials: credentials("secret", "secret"),
            profile: RegistrationProfile::Buyer(BuyerProfile {
                name: "Anna".to_string(),
                surname: "Petrova".to_string(),
                phone: "+7 912 345 67 89".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1990, 4, 12),
                description: String::new(),
            }),
            photo: None,
        }
    }

    fn vendor_form() -> RegistrationForm {
        RegistrationForm {
            credentials: credentials("secret", "secret"),
            profile: RegistrationProfile::Vendor(VendorProfile {
                metiz_name: "Hearth Bakery".to_string(),
                contact_metiz_name: "Ivan Sokolov".to_string(),
                registration_number: "1027700132195".to_string(),
                metiz_phone: "8 (495) 123-45-67".to_string(),
                address: "Moscow, Tverskaya 1".to_string(),
                metiz_description: "Wood-fired bread".to_string(),
            }),
            photo: None,
        }
    }

    #[test]
    fn test_password_mismatch_reported_first() {
        let mut form = vendor_form();
        form.credentials = credentials("secret", "other");
        // Everything else is broken too; the mismatch still wins
        form.credentials.email = String::new();
        if let RegistrationProfile::Vendor(v) = &mut form.profile {
            v.metiz_name.clear();
        }

        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));
    }

    #[test]
    fn test_buyer_payload() {
        let payload = buyer_form().into_payload().unwrap();

        assert_eq!(payload.role, Role::Buyer);
        assert_eq!(payload.path(), "/api/users/registration");
        assert_eq!(payload.field("name"), Some("Anna"));
        assert_eq!(payload.field("surname"), Some("Petrova"));
        assert_eq!(payload.field("birth_date"), Some("1990-04-12"));
        assert_eq!(payload.field("email"), Some("anna@example.ru"));
        assert_eq!(payload.field("password"), Some("secret"));
        assert_eq!(payload.field("address"), None);
    }

    #[test]
    fn test_buyer_without_birth_date_sends_empty_part() {
        let mut form = buyer_form();
        if let RegistrationProfile::Buyer(b) = &mut form.profile {
            b.birth_date = None;
        }

        let payload = form.into_payload().unwrap();
        assert_eq!(payload.field("birth_date"), Some(""));
    }

    #[test]
    fn test_vendor_field_mapping() {
        let payload = vendor_form().into_payload().unwrap();

        assert_eq!(payload.role, Role::Vendor);
        assert_eq!(payload.path(), "/api/metiz/registration");

        let names: Vec<&str> = payload.fields.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            names,
            vec![
                "name",
                "contact_person_name",
                "registration_number",
                "phone",
                "description",
                "address",
                "email",
                "password"
            ]
        );
        assert_eq!(payload.field("name"), Some("Hearth Bakery"));
        assert_eq!(payload.field("contact_person_name"), Some("Ivan Sokolov"));
        assert_eq!(payload.field("phone"), Some("8 (495) 123-45-67"));
    }

    #[test]
    fn test_vendor_requires_its_own_fields() {
        let mut form = vendor_form();
        if let RegistrationProfile::Vendor(v) = &mut form.profile {
            v.address = "  ".to_string();
        }

        assert_eq!(
            form.validate(),
            Err(ValidationError::Required {
                field: "address".to_string()
            })
        );
    }

    #[test]
    fn test_photo_must_be_image() {
        let mut form = buyer_form();
        form.photo = Some(PhotoUpload {
            file_name: "cv.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: vec![1, 2, 3],
        });
        assert!(form.validate().is_err());

        form.photo = Some(PhotoUpload {
            file_name: "me.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        });
        let payload = form.into_payload().unwrap();
        assert_eq!(payload.photo.map(|p| p.file_name), Some("me.png".to_string()));
    }

    #[test]
    fn test_debug_hides_password() {
        let form = buyer_form();
        assert!(!format!("{:?}", form).contains("secret"));

        let payload = form.into_payload().unwrap();
        assert!(!format!("{:?}", payload).contains("secret"));
    }
}
