//! Blocking variant of the CloudLink client, for callers without an async
//! runtime. Mirrors [`crate::client::CloudLinkClient`] operation for
//! operation over `reqwest::blocking`.

use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use validator::Validate;

use crate::client::{decode_payload, push_notification_form, require_id, EMPTY_FORM};
use crate::config::CloudLinkConfig;
use crate::errors::CloudLinkError;
use crate::models::{ObjectData, PushNotification};

/// Blocking client for the Gluon CloudLink Enterprise REST API.
///
/// Must not be used from within an async runtime; use
/// [`crate::CloudLinkClient`] there instead.
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

    /// Create a client on top of a caller-configured blocking reqwest client.
    pub fn with_http_client(config: CloudLinkConfig, http: Client) -> Self {
        Self {
            http,
            base_url: config.root_url(),
            server_key: config.server_key,
        }
    }

    /// Send a push notification and return it as stored by CloudLink, with
    /// the identifier and creation date filled in.
    pub fn send_push_notification(
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
            .send()?;
        let body = Self::expect_ok(response)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Retrieve the object with the given identifier. Returns `Ok(None)`
    /// when no such object exists.
    pub fn get_object<T>(&self, object_id: &str) -> Result<Option<T>, CloudLinkError>
    where
        T: DeserializeOwned,
    {
        require_id("objectId", object_id)?;

        let data = self.fetch_object_data(format!("data/enterprise/object/{object_id}"))?;
        match data.uid {
            Some(_) => Ok(Some(decode_payload(&data)?)),
            None => Ok(None),
        }
    }

    /// Mapper-based variant of [`get_object`](Self::get_object).
    pub fn get_object_with<T, F>(
        &self,
        object_id: &str,
        mapper: F,
    ) -> Result<Option<T>, CloudLinkError>
    where
        F: FnOnce(ObjectData) -> T,
    {
        require_id("objectId", object_id)?;

        let data = self.fetch_object_data(format!("data/enterprise/object/{object_id}"))?;
        Ok(data.exists().then(|| mapper(data)))
    }

    /// Store `value` under the given identifier, overwriting any existing
    /// object.
    pub fn add_object<T>(&self, object_id: &str, value: &T) -> Result<T, CloudLinkError>
    where
        T: Serialize + DeserializeOwned,
    {
        require_id("objectId", object_id)?;

        let data = self.post_value(format!("data/enterprise/object/{object_id}/add"), value)?;
        decode_payload(&data)
    }

    /// Mapper-based variant of [`add_object`](Self::add_object).
    pub fn add_object_with<T, R, F>(
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

        let data = self.post_value(format!("data/enterprise/object/{object_id}/add"), value)?;
        Ok(mapper(data))
    }

    /// Update the object with the given identifier. Returns `Ok(None)` when
    /// no such object exists.
    pub fn update_object<T>(&self, object_id: &str, value: &T) -> Result<Option<T>, CloudLinkError>
    where
        T: Serialize + DeserializeOwned,
    {
        require_id("objectId", object_id)?;

        let data = self.post_value(format!("data/enterprise/object/{object_id}/update"), value)?;
        match data.uid {
            Some(_) => Ok(Some(decode_payload(&data)?)),
            None => Ok(None),
        }
    }

    /// Mapper-based variant of [`update_object`](Self::update_object).
    pub fn update_object_with<T, R, F>(
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

        let data = self.post_value(format!("data/enterprise/object/{object_id}/update"), value)?;
        Ok(data.exists().then(|| mapper(data)))
    }

    /// Remove the object with the given identifier.
    pub fn remove_object(&self, object_id: &str) -> Result<(), CloudLinkError> {
        require_id("objectId", object_id)?;

        self.post_empty_form(format!("data/enterprise/object/{object_id}/remove"))
    }

    /// Retrieve all objects in the given list.
    pub fn get_list<T>(&self, list_id: &str) -> Result<Vec<T>, CloudLinkError>
    where
        T: DeserializeOwned,
    {
        require_id("listId", list_id)?;

        let objects = self.fetch_list_data(list_id)?;
        objects.iter().map(decode_payload).collect()
    }

    /// Mapper-based variant of [`get_list`](Self::get_list).
    pub fn get_list_with<T, F>(&self, list_id: &str, mapper: F) -> Result<Vec<T>, CloudLinkError>
    where
        F: FnMut(ObjectData) -> T,
    {
        require_id("listId", list_id)?;

        let objects = self.fetch_list_data(list_id)?;
        Ok(objects.into_iter().map(mapper).collect())
    }

    /// Add `value` to the given list under the given object identifier.
    pub fn add_to_list<T>(
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

        let data =
            self.post_value(format!("data/enterprise/list/{list_id}/add/{object_id}"), value)?;
        decode_payload(&data)
    }

    /// Mapper-based variant of [`add_to_list`](Self::add_to_list).
    pub fn add_to_list_with<T, R, F>(
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

        let data =
            self.post_value(format!("data/enterprise/list/{list_id}/add/{object_id}"), value)?;
        Ok(mapper(data))
    }

    /// Update an existing object in the given list. Returns `Ok(None)` when
    /// the list has no object with that identifier.
    pub fn update_in_list<T>(
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

        let data = self.post_value(
            format!("data/enterprise/list/{list_id}/update/{object_id}"),
            value,
        )?;
        match data.uid {
            Some(_) => Ok(Some(decode_payload(&data)?)),
            None => Ok(None),
        }
    }

    /// Mapper-based variant of [`update_in_list`](Self::update_in_list).
    pub fn update_in_list_with<T, R, F>(
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

        let data = self.post_value(
            format!("data/enterprise/list/{list_id}/update/{object_id}"),
            value,
        )?;
        Ok(data.exists().then(|| mapper(data)))
    }

    /// Remove the object with the given identifier from the given list.
    pub fn remove_from_list(&self, list_id: &str, object_id: &str) -> Result<(), CloudLinkError> {
        require_id("listId", list_id)?;
        require_id("objectId", object_id)?;

        self.post_empty_form(format!("data/enterprise/list/{list_id}/remove/{object_id}"))
    }

    fn request(&self, method: Method, path: String) -> reqwest::blocking::RequestBuilder {
        let url = format!("{}/3/{}", self.base_url, path);
        self.http
            .request(method, url)
            .header(AUTHORIZATION, format!("Gluon {}", self.server_key))
    }

    fn fetch_object_data(&self, path: String) -> Result<ObjectData, CloudLinkError> {
        let response = self.request(Method::GET, path).send()?;
        let body = Self::expect_ok(response)?;
        Ok(serde_json::from_str(&body)?)
    }

    fn fetch_list_data(&self, list_id: &str) -> Result<Vec<ObjectData>, CloudLinkError> {
        let response = self
            .request(Method::GET, format!("data/enterprise/list/{list_id}"))
            .send()?;
        let body = Self::expect_ok(response)?;
        Ok(serde_json::from_str(&body)?)
    }

    fn post_value<T>(&self, path: String, value: &T) -> Result<ObjectData, CloudLinkError>
    where
        T: Serialize + ?Sized,
    {
        let response = self.request(Method::POST, path).json(value).send()?;
        let body = Self::expect_ok(response)?;
        Ok(serde_json::from_str(&body)?)
    }

    fn post_empty_form(&self, path: String) -> Result<(), CloudLinkError> {
        let response = self.request(Method::POST, path).form(&EMPTY_FORM).send()?;
        Self::expect_ok(response).map(drop)
    }

    fn expect_ok(response: reqwest::blocking::Response) -> Result<String, CloudLinkError> {
        let status = response.status();
        if status == StatusCode::OK {
            Ok(response.text()?)
        } else {
            let body = response.text().unwrap_or_default();
            debug!(status = status.as_u16(), "CloudLink returned an error status");
            Err(CloudLinkError::from_status(status, body))
        }
    }
}
