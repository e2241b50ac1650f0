use serde::{Deserialize, Serialize};

/// Facts the user enters on the profile form. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: Option<String>,
    pub age: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub health_notes: Option<String>,
}

impl UserProfile {
    /// The contact alerts are forwarded to. Requires a stored number.
    pub fn emergency_contact(&self) -> Option<EmergencyContact> {
        Some(EmergencyContact {
            name: self.emergency_contact_name.clone(),
            number: self.emergency_contact_number.clone()?,
        })
    }

    /// Display label of [`Self::emergency_contact`].
    pub fn contact_label(&self) -> Option<String> {
        self.emergency_contact().map(|c| c.label())
    }
}

/// Who to reach in an emergency. The number is what gets dialled or
/// messaged; the name is only for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: Option<String>,
    pub number: String,
}

impl EmergencyContact {
    /// The number, labelled with the name when one is stored.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{name} ({})", self.number),
            None => self.number.clone(),
        }
    }
}
