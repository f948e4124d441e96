use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use validator::Validate;

use crate::config::CloudLinkConfig;
use crate::errors::CloudLinkError;
use crate::models::{ObjectData, PushNotification, TargetType};

/// Asynchronous client for the Gluon CloudLink Enterprise REST API.
///
/// Wraps the push notification endpoint and the object/list data service.
/// All operations validate their arguments before anything is sent, attach
/// the `Authorization: Gluon <server_key>` header, and map non-200 responses
/// to [`CloudLinkError::Status`].
pub struct CloudLinkClient {
    http: Client,
    base_url: String,
    server_key: String,
}

impl CloudLinkClient {
    /// Create a client from the given configuration.
    pub fn new(config: CloudLinkConfig) -> Result<Self, CloudLinkError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_http_client(config, builder.build()?))
    }

    /// Create a client on top of a caller-configured reqwest client, for
    /// custom TLS, proxy or pooling settings.
    pub fn with_http_client(config: CloudLinkConfig, http: Client) -> Self {
        Self {
            http,
            base_url: config.root_url(),
            server_key: config.server_key,
        }
    }

    /// Send a push notification.
    ///
    /// Returns the notification as stored by CloudLink, with the identifier
    /// and creation date filled in.
    pub async fn send_push_notification(
        &self,
        notification: &PushNotification,
    ) -> Result<PushNotification, CloudLinkError> {
        notification.validate()?;

        let form = push_notification_form(notification);

        debug!(
            target_type = notification.target.target_type.as_str(),
            priority = notification.priority.as_str(),
            "sending push notification"
        );

        let response = self
            .request(Method::POST, "push/enterprise/notification".to_string())
            .form(&form)
            .send()
            .await?;
        let body = Self::expect_ok(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Retrieve the object with the given identifier, deserializing its
    /// payload into `T`. Returns `Ok(None)` when no such object exists.
    pub async fn get_object<T>(&self, object_id: &str) -> Result<Option<T>, CloudLinkError>
    where
        T: DeserializeOwned,
    {
        require_id("objectId", object_id)?;

        let data = self
            .fetch_object_data(format!("data/enterprise/object/{object_id}"))
            .await?;
        match data.uid {
            Some(_) => Ok(Some(decode_payload(&data)?)),
            None => Ok(None),
        }
    }

    /// Like [`get_object`](Self::get_object), but maps the raw
    /// [`ObjectData`] through `mapper` instead of deserializing the payload.
    /// The mapper is only applied when the object exists.
    pub async fn get_object_with<T, F>(
        &self,
        object_id: &str,
        mapper: F,
    ) -> Result<Option<T>, CloudLinkError>
    where
        F: FnOnce(ObjectData) -> T,
    {
        require_id("objectId", object_id)?;

        let data = self
            .fetch_object_data(format!("data/enterprise/object/{object_id}"))
            .await?;
        Ok(data.exists().then(|| mapper(data)))
    }

    /// Store `value` under the given identifier, overwriting any existing
    /// object. Returns the stored value.
    pub async fn add_object<T>(&self, object_id: &str, value: &T) -> Result<T, CloudLinkError>
    where
        T: Serialize + DeserializeOwned,
    {
        require_id("objectId", object_id)?;

        let data = self
            .post_value(format!("data/enterprise/object/{object_id}/add"), value)
            .await?;
        decode_payload(&data)
    }

    /// Mapper-based variant of [`add_object`](Self::add_object).
    pub async fn add_object_with<T, R, F>(
        &self,
        object_id: &str,
        value: &T,
        mapper: F,
    ) -> Result<R, CloudLinkError>
    where
        T: Serialize,
        F: FnOnce(ObjectData) -> R,
    {
        require_id("objectId", object_id)?;

        let data = self
            .post_value(format!("data/enterprise/object/{object_id}/add"), value)
            .await?;
        Ok(mapper(data))
    }

    /// Update the object with the given identifier. Returns `Ok(None)` when
    /// no such object exists; nothing is created in that case.
    pub async fn update_object<T>(
        &self,
        object_id: &str,
        value: &T,
    ) -> Result<Option<T>, CloudLinkError>
    where
        T: Serialize + DeserializeOwned,
    {
        require_id("objectId", object_id)?;

        let data = self
            .post_value(format!("data/enterprise/object/{object_id}/update"), value)
            .await?;
        match data.uid {
            Some(_) => Ok(Some(decode_payload(&data)?)),
            None => Ok(None),
        }
    }

    /// Mapper-based variant of [`update_object`](Self::update_object).
    pub async fn update_object_with<T, R, F>(
        &self,
        object_id: &str,
        value: &T,
        mapper: F,
    ) -> Result<Option<R>, CloudLinkError>
    where
        T: Serialize,
        F: FnOnce(ObjectData) -> R,
    {
        require_id("objectId", object_id)?;

        let data = self
            .post_value(format!("data/enterprise/object/{object_id}/update"), value)
            .await?;
        Ok(data.exists().then(|| mapper(data)))
    }

    /// Remove the object with the given identifier.
    pub async fn remove_object(&self, object_id: &str) -> Result<(), CloudLinkError> {
        require_id("objectId", object_id)?;

        self.post_empty_form(format!("data/enterprise/object/{object_id}/remove"))
            .await
    }

    /// Retrieve all objects in the given list, deserializing each payload
    /// into `T`.
    pub async fn get_list<T>(&self, list_id: &str) -> Result<Vec<T>, CloudLinkError>
    where
        T: DeserializeOwned,
    {
        require_id("listId", list_id)?;

        let objects = self.fetch_list_data(list_id).await?;
        objects.iter().map(decode_payload).collect()
    }

    /// Like [`get_list`](Self::get_list), but maps each [`ObjectData`]
    /// through `mapper`.
    pub async fn get_list_with<T, F>(
        &self,
        list_id: &str,
        mapper: F,
    ) -> Result<Vec<T>, CloudLinkError>
    where
        F: FnMut(ObjectData) -> T,
    {
        require_id("listId", list_id)?;

        let objects = self.fetch_list_data(list_id).await?;
        Ok(objects.into_iter().map(mapper).collect())
    }

    /// Add `value` to the given list under the given object identifier.
    pub async fn add_to_list<T>(
        &self,
        list_id: &str,
        object_id: &str,
        value: &T,
    ) -> Result<T, CloudLinkError>
    where
        T: Serialize + DeserializeOwned,
    {
        require_id("listId", list_id)?;
        require_id("objectId", object_id)?;

        let data = self
            .post_value(format!("data/enterprise/list/{list_id}/add/{object_id}"), value)
            .await?;
        decode_payload(&data)
    }

    /// Mapper-based variant of [`add_to_list`](Self::add_to_list).
    pub async fn add_to_list_with<T, R, F>(
        &self,
        list_id: &str,
        object_id: &str,
        value: &T,
        mapper: F,
    ) -> Result<R, CloudLinkError>
    where
        T: Serialize,
        F: FnOnce(ObjectData) -> R,
    {
        require_id("listId", list_id)?;
        require_id("objectId", object_id)?;

        let data = self
            .post_value(format!("data/enterprise/list/{list_id}/add/{object_id}"), value)
            .await?;
        Ok(mapper(data))
    }

    /// Update an existing object in the given list. Returns `Ok(None)` when
    /// the list has no object with that identifier.
    pub async fn update_in_list<T>(
        &self,
        list_id: &str,
        object_id: &str,
        value: &T,
    ) -> Result<Option<T>, CloudLinkError>
    where
        T: Serialize + DeserializeOwned,
    {
        require_id("listId", list_id)?;
        require_id("objectId", object_id)?;

        let data = self
            .post_value(
                format!("data/enterprise/list/{list_id}/update/{object_id}"),
                value,
            )
            .await?;
        match data.uid {
            Some(_) => Ok(Some(decode_payload(&data)?)),
            None => Ok(None),
        }
    }

    /// Mapper-based variant of [`update_in_list`](Self::update_in_list).
    pub async fn update_in_list_with<T, R, F>(
        &self,
        list_id: &str,
        object_id: &str,
        value: &T,
        mapper: F,
    ) -> Result<Option<R>, CloudLinkError>
    where
        T: Serialize,
        F: FnOnce(ObjectData) -> R,
    {
        require_id("listId", list_id)?;
        require_id("objectId", object_id)?;

        let data = self
            .post_value(
                format!("data/enterprise/list/{list_id}/update/{object_id}"),
                value,
            )
            .await?;
        Ok(data.exists().then(|| mapper(data)))
    }

    /// Remove the object with the given identifier from the given list.
    pub async fn remove_from_list(
        &self,
        list_id: &str,
        object_id: &str,
    ) -> Result<(), CloudLinkError> {
        require_id("listId", list_id)?;
        require_id("objectId", object_id)?;

        self.post_empty_form(format!("data/enterprise/list/{list_id}/remove/{object_id}"))
            .await
    }

    fn request(&self, method: Method, path: String) -> reqwest::RequestBuilder {
        let url = format!("{}/3/{}", self.base_url, path);
        self.http
            .request(method, url)
            .header(AUTHORIZATION, format!("Gluon {}", self.server_key))
    }

    async fn fetch_object_data(&self, path: String) -> Result<ObjectData, CloudLinkError> {
        let response = self.request(Method::GET, path).send().await?;
        let body = Self::expect_ok(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_list_data(&self, list_id: &str) -> Result<Vec<ObjectData>, CloudLinkError> {
        let response = self
            .request(Method::GET, format!("data/enterprise/list/{list_id}"))
            .send()
            .await?;
        let body = Self::expect_ok(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_value<T>(&self, path: String, value: &T) -> Result<ObjectData, CloudLinkError>
    where
        T: Serialize + ?Sized,
    {
        let response = self.request(Method::POST, path).json(value).send().await?;
        let body = Self::expect_ok(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_empty_form(&self, path: String) -> Result<(), CloudLinkError> {
        let response = self
            .request(Method::POST, path)
            .form(&EMPTY_FORM)
            .send()
            .await?;
        Self::expect_ok(response).await.map(drop)
    }

    async fn expect_ok(response: reqwest::Response) -> Result<String, CloudLinkError> {
        let status = response.status();
        if status == StatusCode::OK {
            Ok(response.text().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "CloudLink returned an error status");
            Err(CloudLinkError::from_status(status, body))
        }
    }
}

// Remove operations post an empty form body, matching the service contract.
pub(crate) const EMPTY_FORM: [(&str, &str); 0] = [];

pub(crate) fn require_id(name: &'static str, value: &str) -> Result<(), CloudLinkError> {
    if value.is_empty() {
        return Err(CloudLinkError::EmptyIdentifier(name));
    }
    Ok(())
}

pub(crate) fn decode_payload<T>(data: &ObjectData) -> Result<T, CloudLinkError>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_str(&data.payload)?)
}

/// Form fields for the push notification endpoint. The topic or device token
/// is only included when it matches the target type.
pub(crate) fn push_notification_form(
    notification: &PushNotification,
) -> Vec<(&'static str, String)> {
    let mut form = vec![
        (
            "customIdentifier",
            notification.custom_identifier.clone(),
        ),
        ("title", notification.title.clone()),
        ("body", notification.body.clone()),
        ("deliveryDate", notification.delivery_date.to_string()),
        ("priority", notification.priority.as_str().to_string()),
        (
            "expirationType",
            notification.expiration_type.as_str().to_string(),
        ),
        (
            "expirationAmount",
            notification.expiration_amount.to_string(),
        ),
        (
            "targetType",
            notification.target.target_type.as_str().to_string(),
        ),
        ("invisible", notification.invisible.to_string()),
    ];

    match notification.target.target_type {
        TargetType::Topic => form.push(("targetTopic", notification.target.topic.clone())),
        TargetType::SingleDevice => {
            form.push(("targetDeviceToken", notification.target.device_token.clone()))
        }
        TargetType::AllDevices => {}
    }

    form
}
