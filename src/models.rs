use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Push notification request/response payload.
///
/// `identifier` and `creation_date` are assigned by CloudLink and are only
/// populated in the notification returned after sending.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = validate_expiration))]
pub struct PushNotification {
    pub identifier: Option<String>,
    pub creation_date: i64,
    pub custom_identifier: String,
    pub title: String,
    pub body: String,
    /// Epoch millis. Scheduled delivery is not honored by the service yet,
    /// but the field is part of the wire format and must not be negative.
    #[validate(range(min = 0))]
    pub delivery_date: i64,
    pub priority: Priority,
    pub expiration_type: ExpirationType,
    pub expiration_amount: i32,
    #[validate(nested)]
    pub target: PushNotificationTarget,
    /// Silent push: no visual notification is shown on the device.
    pub invisible: bool,
}

impl Default for PushNotification {
    fn default() -> Self {
        Self {
            identifier: None,
            creation_date: 0,
            custom_identifier: String::new(),
            title: String::new(),
            body: String::new(),
            delivery_date: 0,
            priority: Priority::Normal,
            expiration_type: ExpirationType::Weeks,
            expiration_amount: 4,
            target: PushNotificationTarget::default(),
            invisible: false,
        }
    }
}

// Notifications are identified by the server-assigned identifier alone.
impl PartialEq for PushNotification {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for PushNotification {}

fn validate_expiration(notification: &PushNotification) -> Result<(), ValidationError> {
    let max = notification.expiration_type.max_amount();
    if notification.expiration_amount < 0 || notification.expiration_amount > max {
        let mut error = ValidationError::new("expiration_amount");
        error.message = Some(
            format!(
                "value must be between 0 and {} when using expiration type {}",
                max,
                notification.expiration_type.as_str()
            )
            .into(),
        );
        return Err(error);
    }
    Ok(())
}

/// Push notification priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Delivered immediately by the underlying push service, at the cost of
    /// higher battery drain.
    High,
    /// Delivery may be delayed to conserve battery. Use for less
    /// time-sensitive messages.
    #[default]
    Normal,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Normal => "NORMAL",
        }
    }
}

/// Unit of the expiration amount, with a per-unit maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpirationType {
    #[default]
    Weeks,
    Days,
    Hours,
    Minutes,
}

impl ExpirationType {
    /// Maximum allowed expiration amount for this unit.
    pub fn max_amount(&self) -> i32 {
        match self {
            ExpirationType::Weeks => 4,
            ExpirationType::Days => 7,
            ExpirationType::Hours => 24,
            ExpirationType::Minutes => 60,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpirationType::Weeks => "WEEKS",
            ExpirationType::Days => "DAYS",
            ExpirationType::Hours => "HOURS",
            ExpirationType::Minutes => "MINUTES",
        }
    }
}

/// Devices a push notification is sent to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = validate_target))]
pub struct PushNotificationTarget {
    #[serde(rename = "type")]
    pub target_type: TargetType,
    /// Topic a device must be subscribed to. Ignored unless the target type
    /// is [`TargetType::Topic`].
    pub topic: String,
    /// Token of the receiving device. Ignored unless the target type is
    /// [`TargetType::SingleDevice`].
    pub device_token: String,
}

impl PushNotificationTarget {
    /// Target every registered device.
    pub fn all_devices() -> Self {
        Self::default()
    }

    /// Target all devices subscribed to `topic`.
    pub fn topic(topic: impl Into<String>) -> Self {
        Self {
            target_type: TargetType::Topic,
            topic: topic.into(),
            device_token: String::new(),
        }
    }

    /// Target the single device identified by `device_token`.
    pub fn single_device(device_token: impl Into<String>) -> Self {
        Self {
            target_type: TargetType::SingleDevice,
            topic: String::new(),
            device_token: device_token.into(),
        }
    }
}

fn validate_target(target: &PushNotificationTarget) -> Result<(), ValidationError> {
    match target.target_type {
        TargetType::Topic if target.topic.trim().is_empty() => {
            let mut error = ValidationError::new("topic");
            error.message = Some("topic must not be blank when the target type is TOPIC".into());
            Err(error)
        }
        TargetType::SingleDevice if target.device_token.trim().is_empty() => {
            let mut error = ValidationError::new("device_token");
            error.message =
                Some("deviceToken must not be blank when the target type is SINGLE_DEVICE".into());
            Err(error)
        }
        _ => Ok(()),
    }
}

/// Kind of push notification target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    #[default]
    AllDevices,
    Topic,
    SingleDevice,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::AllDevices => "ALL_DEVICES",
            TargetType::Topic => "TOPIC",
            TargetType::SingleDevice => "SINGLE_DEVICE",
        }
    }
}

/// A stored CloudLink object, standalone or linked to a list.
///
/// `payload` is the object serialized as a JSON string. A response without a
/// `uid` means the requested object does not exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectData {
    pub uid: Option<String>,
    pub payload: String,
}

impl ObjectData {
    pub fn exists(&self) -> bool {
        self.uid.is_some()
    }
}

/// JSON envelope for raw string payloads.
///
/// The data service stores payloads as JSON objects, so plain strings go over
/// the wire as `{"v": "<string>"}`. Wrap strings in this type when storing
/// them through the generic object API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringObject {
    pub v: String,
}

impl StringObject {
    pub fn new(value: impl Into<String>) -> Self {
        Self { v: value.into() }
    }

    pub fn into_inner(self) -> String {
        self.v
    }
}

impl From<&str> for StringObject {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StringObject {
    fn from(value: String) -> Self {
        Self { v: value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_notification_is_valid() {
        assert!(PushNotification::default().validate().is_ok());
    }

    #[test]
    fn expiration_amount_above_unit_maximum_is_rejected() {
        let notification = PushNotification {
            expiration_type: ExpirationType::Days,
            expiration_amount: 8,
            ..Default::default()
        };

        let errors = notification.validate().unwrap_err();
        let rendered = errors.to_string();
        assert!(
            rendered.contains("value must be between 0 and 7 when using expiration type DAYS"),
            "unexpected message: {rendered}"
        );
    }

    #[test]
    fn negative_expiration_amount_is_rejected() {
        let notification = PushNotification {
            expiration_amount: -1,
            ..Default::default()
        };

        assert!(notification.validate().is_err());

        let notification = PushNotification {
            expiration_amount: 3,
            ..notification
        };
        assert!(notification.validate().is_ok());
    }

    #[test]
    fn negative_delivery_date_is_rejected() {
        let notification = PushNotification {
            delivery_date: -189,
            ..Default::default()
        };
        assert!(notification.validate().is_err());

        let notification = PushNotification {
            delivery_date: 1_500_000_000_000,
            ..notification
        };
        assert!(notification.validate().is_ok());
    }

    #[test]
    fn topic_target_requires_topic() {
        let target = PushNotificationTarget {
            target_type: TargetType::Topic,
            ..Default::default()
        };
        assert!(target.validate().is_err());

        let target = PushNotificationTarget::topic("   ");
        assert!(target.validate().is_err());

        let target = PushNotificationTarget::topic("sports");
        assert!(target.validate().is_ok());
    }

    #[test]
    fn single_device_target_requires_device_token() {
        let target = PushNotificationTarget {
            target_type: TargetType::SingleDevice,
            ..Default::default()
        };
        assert!(target.validate().is_err());

        let target = PushNotificationTarget::single_device("fa91b5b4");
        assert!(target.validate().is_ok());
    }

    #[test]
    fn invalid_target_fails_notification_validation() {
        let notification = PushNotification {
            target: PushNotificationTarget::topic(""),
            ..Default::default()
        };
        assert!(notification.validate().is_err());
    }

    #[test]
    fn enums_use_screaming_snake_case_on_the_wire() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"HIGH\"");
        assert_eq!(
            serde_json::to_string(&ExpirationType::Minutes).unwrap(),
            "\"MINUTES\""
        );
        assert_eq!(
            serde_json::to_string(&TargetType::AllDevices).unwrap(),
            "\"ALL_DEVICES\""
        );
    }

    #[test]
    fn notification_response_fills_defaults_for_missing_fields() {
        let notification: PushNotification =
            serde_json::from_str("{\"identifier\":\"abc-123\",\"creationDate\":1500}").unwrap();

        assert_eq!(notification.identifier.as_deref(), Some("abc-123"));
        assert_eq!(notification.creation_date, 1500);
        assert_eq!(notification.priority, Priority::Normal);
        assert_eq!(notification.expiration_type, ExpirationType::Weeks);
        assert_eq!(notification.expiration_amount, 4);
        assert_eq!(notification.target.target_type, TargetType::AllDevices);
    }

    #[test]
    fn object_data_without_uid_means_missing() {
        let data: ObjectData = serde_json::from_str("{\"payload\":\"{}\"}").unwrap();
        assert!(!data.exists());
        assert_eq!(data.payload, "{}");
    }

    #[test]
    fn string_object_envelope() {
        let wrapped = StringObject::new("sample!");
        assert_eq!(
            serde_json::to_string(&wrapped).unwrap(),
            "{\"v\":\"sample!\"}"
        );

        let parsed: StringObject = serde_json::from_str("{\"v\":\"sample!\"}").unwrap();
        assert_eq!(parsed.into_inner(), "sample!");
    }
}
