//! Verb facades.
//!
//! [`Get`], [`Put`], [`Post`] and [`Delete`] fix the HTTP method on top of the
//! shared [`Http`] core. A call runs the payload stage (when there is a body),
//! the executor and the response stage, in that order, and stops at the first
//! failure.
//!
//! ```rust,no_run
//! use librest::network::application::http::{Get, Post};
//! use librest::serialization::Format;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! #[serde(rename = "command")]
//! struct Command {
//!     name: String,
//! }
//!
//! #[derive(Deserialize)]
//! struct Ack {
//!     accepted: bool,
//! }
//!
//! let status = Get::new("http://192.168.1.20/status").send()?;
//!
//! let ack: Ack = Post::with_builder(|b| b.host("192.168.1.20").path("commands"))
//!     .payload_format(Format::Xml)
//!     .format(Format::Json)
//!     .fetch_payload(&Command { name: "reboot".into() })?;
//! assert!(ack.accepted);
//! # drop(status);
//! # Ok::<(), librest::Error>(())
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::client::{Executor, Header, Headers, HttpExecutor, Method, Request, Response};
use super::options::{Config, Options};
use super::payload::{self, Payload, PreparedBody};
use super::response::{interpret, interpret_raw};
use super::url::UrlBuilder;
use crate::error::Result;
use crate::network::error::Error as TransportError;
use crate::serialization::{Encoding, Format, SerializerKind};

/// Method-agnostic call core shared by the facades.
#[derive(Debug)]
pub struct Http<E = HttpExecutor> {
    method: Method,
    url: String,
    executor: E,
    config: Config,
    options: Options,
    headers: Vec<(String, String)>,
    pending: Option<PreparedBody>,
}

impl Http<HttpExecutor> {
    /// Targets `url` over plain TCP.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self::with_executor(method, url, HttpExecutor::default())
    }

    /// Targets the URL assembled by `build`.
    pub fn with_builder<F>(method: Method, build: F) -> Self
    where
        F: FnOnce(UrlBuilder) -> UrlBuilder,
    {
        Self::new(method, build(UrlBuilder::new()).build())
    }
}

impl<E: Executor> Http<E> {
    /// Targets `url` through `executor`.
    pub fn with_executor(method: Method, url: impl Into<String>, executor: E) -> Self {
        Self {
            method,
            url: url.into(),
            executor,
            config: Config::default(),
            options: Options::default(),
            headers: Vec::new(),
            pending: None,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Adds a header to every request of this facade. Headers named here take
    /// the place of the generated `User-Agent`, `Accept` and `Content-Type`.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// The body the next call sends when it is given none.
    pub fn pending(&self) -> Option<&PreparedBody> {
        self.pending.as_ref()
    }

    /// Queues `text` verbatim as the body of the next call.
    pub fn set_payload_text(&mut self, text: &str) {
        let format = self.options.payload_format_or(&self.config);
        self.pending = Some(payload::prepare_text(text, format));
    }

    /// Serializes `value` and queues it as the body of the next call.
    pub fn set_payload<P: Serialize + ?Sized>(&mut self, value: &P) -> Result<()> {
        let codec = self.options.payload_codec(&self.config);
        self.pending = Some(payload::prepare(value, &codec)?);
        Ok(())
    }

    /// Executes the call and returns the body text unchanged.
    pub fn call_raw<P: Serialize + ?Sized>(&mut self, body: Payload<'_, P>, overrides: Options) -> Result<String> {
        let options = overrides.or(self.options);
        let response = self.dispatch(body, &options, None)?;
        interpret_raw(&response)
    }

    /// Executes the call and decodes the body into `R`.
    pub fn call<P, R>(&mut self, body: Payload<'_, P>, overrides: Options) -> Result<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let options = overrides.or(self.options);
        let codec = options.response_codec(&self.config);
        let response = self.dispatch(body, &options, Some(codec.format))?;
        interpret(&response, codec.format, codec.serializer)
    }

    fn dispatch<P: Serialize + ?Sized>(
        &mut self,
        body: Payload<'_, P>,
        options: &Options,
        accept: Option<Format>,
    ) -> Result<Response> {
        let pending = self.pending.take();
        let body = match body {
            Payload::Empty => pending,
            Payload::Text(text) => Some(payload::prepare_text(text, options.payload_format_or(&self.config))),
            Payload::Typed(value) => Some(payload::prepare(value, &options.payload_codec(&self.config))?),
        };

        let request = self.build_request(body, accept)?;
        tracing::debug!(method = %self.method, url = %self.url, "dispatching request");
        let response = self.executor.execute(request)?;
        tracing::debug!(
            method = %self.method,
            url = %self.url,
            status = response.status_code,
            "response received"
        );
        Ok(response)
    }

    fn build_request(&self, body: Option<PreparedBody>, accept: Option<Format>) -> Result<Request, TransportError> {
        let mut headers = Headers::new();
        let mut push = |name: &str, value: &str| -> Result<(), TransportError> {
            headers
                .push(Header::new(name, value)?)
                .map_err(|_| TransportError::ProtocolError)
        };

        if !self.has_header("User-Agent") {
            push("User-Agent", &self.config.user_agent)?;
        }
        if let Some(format) = accept {
            if !self.has_header("Accept") {
                push("Accept", format.media_type())?;
            }
        }
        if let Some(body) = &body {
            if !self.has_header("Content-Type") {
                push("Content-Type", &body.content_type)?;
            }
        }
        for (name, value) in &self.headers {
            push(name, value)?;
        }

        Ok(Request::new(
            self.method,
            self.url.clone(),
            headers,
            body.map(|body| body.bytes),
        ))
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .any(|(custom, _)| custom.eq_ignore_ascii_case(name))
    }
}

macro_rules! verb_facade {
    ($(#[$doc:meta])* $name:ident, $method:expr) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $name<E = HttpExecutor> {
            http: Http<E>,
        }

        impl $name<HttpExecutor> {
            /// Targets `url` over plain TCP.
            pub fn new(url: impl Into<String>) -> Self {
                Self {
                    http: Http::new($method, url),
                }
            }

            /// Targets the URL assembled by `build`.
            pub fn with_builder<F>(build: F) -> Self
            where
                F: FnOnce(UrlBuilder) -> UrlBuilder,
            {
                Self {
                    http: Http::with_builder($method, build),
                }
            }
        }

        impl<E: Executor> $name<E> {
            /// Targets `url` through `executor`.
            pub fn with_executor(url: impl Into<String>, executor: E) -> Self {
                Self {
                    http: Http::with_executor($method, url, executor),
                }
            }

            /// Replaces the global defaults.
            pub fn config(mut self, config: Config) -> Self {
                self.http.set_config(config);
                self
            }

            /// Replaces every option at once.
            pub fn options(mut self, options: Options) -> Self {
                *self.http.options_mut() = options;
                self
            }

            /// Format of the response, and of the payload unless
            /// [`payload_format`](Self::payload_format) is set.
            pub fn format(mut self, format: Format) -> Self {
                self.http.options_mut().format = Some(format);
                self
            }

            /// Serializer of the response, and of the payload unless
            /// [`payload_serializer`](Self::payload_serializer) is set.
            pub fn serializer(mut self, serializer: SerializerKind) -> Self {
                self.http.options_mut().serializer = Some(serializer);
                self
            }

            pub fn payload_encoding(mut self, encoding: Encoding) -> Self {
                self.http.options_mut().payload_encoding = Some(encoding);
                self
            }

            pub fn payload_format(mut self, format: Format) -> Self {
                self.http.options_mut().payload_format = Some(format);
                self
            }

            pub fn payload_serializer(mut self, serializer: SerializerKind) -> Self {
                self.http.options_mut().payload_serializer = Some(serializer);
                self
            }

            /// Adds a request header.
            pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
                self.http.set_header(name, value);
                self
            }

            pub fn http(&self) -> &Http<E> {
                &self.http
            }

            pub fn http_mut(&mut self) -> &mut Http<E> {
                &mut self.http
            }

            /// Executes the call and returns the body text unchanged.
            pub fn send(&mut self) -> Result<String> {
                self.http.call_raw(Payload::<()>::Empty, Options::default())
            }

            /// Executes the call and decodes the body into `R`.
            pub fn fetch<R: DeserializeOwned>(&mut self) -> Result<R> {
                self.http.call::<(), R>(Payload::Empty, Options::default())
            }
        }
    };
}

macro_rules! payload_entry_points {
    ($name:ident) => {
        impl<E: Executor> $name<E> {
            /// Queues `text` verbatim as the body of the next call.
            pub fn set_payload_text(&mut self, text: &str) -> &mut Self {
                self.http.set_payload_text(text);
                self
            }

            /// Serializes `payload` and queues it as the body of the next call.
            pub fn set_payload<P: Serialize + ?Sized>(&mut self, payload: &P) -> Result<&mut Self> {
                self.http.set_payload(payload)?;
                Ok(self)
            }

            /// Sends `text` verbatim and returns the body text unchanged.
            pub fn send_text(&mut self, text: &str) -> Result<String> {
                self.http.call_raw(Payload::<()>::Text(text), Options::default())
            }

            /// Sends `text` verbatim and decodes the body into `R`.
            pub fn fetch_text<R: DeserializeOwned>(&mut self, text: &str) -> Result<R> {
                self.http.call::<(), R>(Payload::Text(text), Options::default())
            }

            /// Serializes and sends `payload`, returning the body text unchanged.
            pub fn send_payload<P: Serialize + ?Sized>(&mut self, payload: &P) -> Result<String> {
                self.http.call_raw(Payload::Typed(payload), Options::default())
            }

            /// Serializes and sends `payload`, decoding the body into `R`.
            pub fn fetch_payload<P, R>(&mut self, payload: &P) -> Result<R>
            where
                P: Serialize + ?Sized,
                R: DeserializeOwned,
            {
                self.http.call(Payload::Typed(payload), Options::default())
            }
        }
    };
}

verb_facade!(
    /// `GET` facade.
    Get,
    Method::Get
);
verb_facade!(
    /// `PUT` facade.
    Put,
    Method::Put
);
verb_facade!(
    /// `POST` facade.
    Post,
    Method::Post
);
verb_facade!(
    /// `DELETE` facade.
    Delete,
    Method::Delete
);

payload_entry_points!(Put);
payload_entry_points!(Post);
