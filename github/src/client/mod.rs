use log::{debug, trace};
use reqwest::{
    blocking::{Client as ReqwestClient, RequestBuilder, Response as ReqwestResponse},
    header, redirect, Method, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

mod auth;
mod error;
mod rate_limit;
mod submission;

pub use auth::{test_auth, test_two_factor_auth, Credential};
pub use error::{Error, GithubClientError, GithubClientErrorType, Result};
pub use rate_limit::Rate;
pub use submission::{SubmissionClient, SubmissionTarget};

// Constants
pub const DEFAULT_BASE_URL: &str = "https://github.gatech.edu/api/v3/";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const HEADER_RATE_LIMIT: &str = "X-RateLimit-Limit";
const HEADER_RATE_REMAINING: &str = "X-RateLimit-Remaining";
const HEADER_RATE_RESET: &str = "X-RateLimit-Reset";
pub const HEADER_OTP: &str = "X-GitHub-OTP";

const MEDIA_TYPE_V3: &str = "application/vnd.github.v3+json";

#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    user_agent: Option<String>,
    credential: Option<Credential>,
    otp: Option<String>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            credential: None,
            otp: None,
        }
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// One-time password sent as `X-GitHub-OTP` with every request
    pub fn otp<S: Into<String>>(mut self, otp: S) -> Self {
        self.otp = Some(otp.into());
        self
    }

    pub fn build(self) -> Result<Client> {
        let mut base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = url::Url::parse(&base_url)?;
        if base.cannot_be_a_base() {
            return Err(format!("not a base url: {}", base_url).into());
        }

        let user_agent = self.user_agent.unwrap_or_else(|| USER_AGENT.to_owned());

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(MEDIA_TYPE_V3));

        if let Some(credential) = &self.credential {
            let mut value = header::HeaderValue::from_str(&credential.authorization())?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        if let Some(otp) = &self.otp {
            headers.insert(HEADER_OTP, header::HeaderValue::from_str(otp)?);
        }

        // Redirects are surfaced to the caller, who follows them explicitly
        let client = ReqwestClient::builder()
            .user_agent(&user_agent)
            .default_headers(headers)
            .redirect(redirect::Policy::none())
            .build()?;

        // Redirect targets are fetched without API credentials
        let download_client = ReqwestClient::builder().user_agent(&user_agent).build()?;

        Ok(Client {
            base_url,
            base,
            user_agent,
            has_otp: self.otp.is_some(),
            client,
            download_client,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Client {
    /// Base URL to use for API requests. Defaults to the Georgia Tech GitHub
    /// Enterprise instance. Always terminated with a trailing slash.
    base_url: String,

    base: url::Url,

    /// User agent string sent when communicating with GitHub APIs
    user_agent: String,

    has_otp: bool,

    /// Client used to make API requests, never follows redirects
    client: ReqwestClient,

    /// Client used to fetch redirect targets such as zipball archives
    download_client: ReqwestClient,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("has_otp", &self.has_otp)
            .finish()
    }
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a path relative to the base URL from its segments, percent
    /// encoding each one so that `/`, `?` and `#` stay part of the segment.
    pub fn path(&self, segments: &[&str]) -> Result<String> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::from("base url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);

        Ok(url.path()[self.base.path().len()..].to_owned())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    /// Issue a single request against the API.
    ///
    /// Any status code is a successful exchange; only transport failures are
    /// reported as errors. Non-GET requests without a body declare a zero
    /// length body.
    pub fn do_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Exchange> {
        let mut builder = self.request(method.clone(), path);

        if method != Method::GET {
            builder = match body {
                Some(body) => builder.json(body),
                None => builder.header(header::CONTENT_LENGTH, "0"),
            };
        }

        self.send(method, path, builder)
    }

    pub(crate) fn get(&self, path: &str) -> Result<Exchange> {
        self.do_request::<()>(Method::GET, path, None)
    }

    pub(crate) fn post(&self, path: &str) -> Result<Exchange> {
        self.do_request::<()>(Method::POST, path, None)
    }

    pub(crate) fn post_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Exchange> {
        let builder = self
            .request(Method::POST, path)
            .query(query)
            .header(header::CONTENT_LENGTH, "0");

        self.send(Method::POST, path, builder)
    }

    pub(crate) fn put(&self, path: &str) -> Result<Exchange> {
        self.do_request::<()>(Method::PUT, path, None)
    }

    pub(crate) fn delete(&self, path: &str) -> Result<Exchange> {
        self.do_request::<()>(Method::DELETE, path, None)
    }

    fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<Exchange> {
        let response = builder.send()?;
        debug!("{} {}{} -> {}", method, self.base_url, path, response.status());
        trace!("Github Response: {:#?}", response);

        let exchange = Exchange::new(response);
        trace!("{:?}", exchange.rate());

        Ok(exchange)
    }

    /// Fetch a redirect target, following any further redirects and sending
    /// no API credentials.
    pub(crate) fn follow(&self, location: &str) -> Result<ReqwestResponse> {
        let url = url::Url::parse(location)?;
        debug!("GET {} (redirect)", url);

        let response = self.download_client.get(url).send()?.error_for_status()?;
        Ok(response)
    }
}

/// A completed HTTP request/response pair.
///
/// Status and headers are always available. Reading the body is fallible and
/// consumes the exchange.
#[derive(Debug)]
pub struct Exchange {
    response: ReqwestResponse,
}

impl Exchange {
    fn new(response: ReqwestResponse) -> Self {
        Self { response }
    }

    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn headers(&self) -> &header::HeaderMap {
        self.response.headers()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name).and_then(|h| h.to_str().ok())
    }

    pub fn location(&self) -> Option<&str> {
        self.header(header::LOCATION.as_str())
    }

    pub fn rate(&self) -> Rate {
        Rate::from_headers(self.headers())
    }

    pub fn text(self) -> Result<String> {
        Ok(self.response.text()?)
    }

    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        let payload = self.text()?;
        Ok(serde_json::from_str(&payload)?)
    }

    /// Turn a non-success exchange into an error, decoding Github's error
    /// payload when there is one.
    pub fn into_error(self) -> Error {
        let status = self.status();
        let payload = self.json::<GithubClientError>().ok();
        Error::UnexpectedStatus(status, payload)
    }
}

#[cfg(test)]
mod test {
    use super::{Client, HEADER_OTP};
    use crate::client::Credential;
    use httpmock::prelude::*;
    use reqwest::{Method, StatusCode};
    use serde_json::json;

    fn client(server: &MockServer) -> Client {
        Client::builder()
            .base_url(server.base_url())
            .credential(Credential::from_base64("dXNlcjpwYXNz"))
            .build()
            .unwrap()
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = Client::builder()
            .base_url("https://github.example.com/api/v3")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://github.example.com/api/v3/");
    }

    #[test]
    fn path_segments_are_encoded() {
        let client = Client::builder()
            .base_url("https://github.example.com/api/v3/")
            .build()
            .unwrap();

        assert_eq!(
            client.path(&["repos", "alice", "hw1"]).unwrap(),
            "repos/alice/hw1"
        );
        assert_eq!(
            client
                .path(&["repos", "alice", "hw1", "contents", "a#b?c d/e.txt"])
                .unwrap(),
            "repos/alice/hw1/contents/a%23b%3Fc%20d%2Fe.txt"
        );
    }

    #[test]
    fn path_on_root_base_url() {
        let server = MockServer::start();
        assert_eq!(
            client(&server).path(&["user", "repos"]).unwrap(),
            "user/repos"
        );
    }

    #[test]
    fn invalid_base_url() {
        assert!(Client::builder().base_url("not a url").build().is_err());
    }

    #[test]
    fn basic_auth_header() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/alice/hw1")
                .header("authorization", "Basic dXNlcjpwYXNz");
            then.status(200);
        });

        let exchange = client(&server).get("repos/alice/hw1").unwrap();

        mock.assert();
        assert_eq!(exchange.status(), StatusCode::OK);
    }

    #[test]
    fn otp_header_on_every_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/repos/alice/hw1/collaborators/bob")
                .header(HEADER_OTP, "123456");
            then.status(204);
        });

        let client = Client::builder()
            .base_url(server.base_url())
            .credential(Credential::from_base64("dXNlcjpwYXNz"))
            .otp("123456")
            .build()
            .unwrap();

        let exchange = client.put("repos/alice/hw1/collaborators/bob").unwrap();

        mock.assert();
        assert_eq!(exchange.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn empty_body_declares_zero_length() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(DELETE)
                .path("/repos/alice/hw1")
                .header("content-length", "0");
            then.status(204);
        });

        client(&server).delete("repos/alice/hw1").unwrap();

        mock.assert();
    }

    #[test]
    fn json_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/user/repos")
                .header("content-type", "application/json")
                .json_body(json!({ "name": "hw1", "private": true }));
            then.status(201);
        });

        let body = json!({ "name": "hw1", "private": true });
        let exchange = client(&server)
            .do_request(Method::POST, "user/repos", Some(&body))
            .unwrap();

        mock.assert();
        assert_eq!(exchange.status(), StatusCode::CREATED);
    }

    #[test]
    fn redirects_are_not_followed() {
        let server = MockServer::start();
        let target = server.mock(|when, then| {
            when.method(GET).path("/elsewhere");
            then.status(200);
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/alice/hw1/zipball");
            then.status(302)
                .header("Location", server.url("/elsewhere"));
        });

        let exchange = client(&server).get("repos/alice/hw1/zipball").unwrap();

        assert_eq!(exchange.status(), StatusCode::FOUND);
        assert_eq!(exchange.location(), Some(server.url("/elsewhere").as_str()));
        target.assert_hits(0);
    }

    #[test]
    fn error_payload() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/alice/hw1/contents/a.txt");
            then.status(403)
                .header("content-type", "application/json")
                .json_body(json!({
                    "message": "Must have admin rights to Repository.",
                    "documentation_url": "https://developer.github.com/v3/repos/contents/"
                }));
        });

        let exchange = client(&server)
            .get("repos/alice/hw1/contents/a.txt")
            .unwrap();

        match exchange.into_error() {
            crate::client::Error::UnexpectedStatus(status, Some(payload)) => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(
                    payload.message.as_deref(),
                    Some("Must have admin rights to Repository.")
                );
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
