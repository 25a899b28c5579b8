//! Talks to a TEAM Engine instance and glues the result pipeline together.

pub mod error;

pub use self::error::Error;

use crate::configuration::command_line::OutputFormat;
use crate::configuration::settings::Settings;
use crate::connection::SendMessage;
use crate::model::{SerializationDetails, TestSuiteResult};
use crate::reporter::{self, RenderConfig};
use derivative::*;
use http::header::{ACCEPT, AUTHORIZATION};
use http::{Method, Request as HttpRequest, Response as HttpResponse};
use reqwest::Url;
use std::fmt;
use std::fs;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

const XML_MEDIA_TYPE: &str = "application/xml";

#[derive(Derivative)]
#[derivative(Debug)]
pub struct App<T> {
    #[derivative(Debug = "ignore")]
    client: T,
    base_url: String,
    username: String,
    #[derivative(Debug = "ignore")]
    password: String,
    poll_interval: Duration,
    poll_attempts: u32,
}

impl<T> App<T> {
    pub fn new(client: T, base_url: &str, settings: &Settings) -> Self {
        App {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            username: settings.teamengine_username.clone(),
            password: settings.teamengine_password.clone(),
            poll_interval: settings.poll_interval,
            poll_attempts: settings.poll_attempts.max(1),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn send<E>(&self, request: HttpRequest<Vec<u8>>) -> Result<HttpResponse<Vec<u8>>, Error>
    where
        T: SendMessage<HttpRequest<Vec<u8>>, Result<HttpResponse<Vec<u8>>, E>>,
        E: fmt::Display,
    {
        self.client
            .send(request)
            .map_err(|err| Error::Connection(err.to_string()))
    }

    fn request(&self, url: &str, accept: Option<&str>) -> Result<HttpRequest<Vec<u8>>, Error> {
        let credentials = format!("{}:{}", self.username, self.password);
        let mut request = HttpRequest::builder()
            .method(Method::GET)
            .uri(url)
            .header(AUTHORIZATION, format!("Basic {}", base64::encode(credentials)));
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }
        request
            .body(Vec::new())
            .map_err(|err| Error::Request(err.to_string()))
    }

    /// The suite identifier is a single path segment, whatever it contains.
    fn suite_url(&self, suite_identifier: &str, inputs: &[(String, String)]) -> Result<Url, Error> {
        let mut url =
            Url::parse(&self.base_url).map_err(|err| Error::Request(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| Error::Request(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(&["rest", "suites", suite_identifier, "run"]);
        if !inputs.is_empty() {
            url.query_pairs_mut().extend_pairs(
                inputs
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            );
        }
        Ok(url)
    }

    /// Polls the engine until it answers with a success status.
    pub fn wait_for_teamengine<E>(&self) -> Result<(), Error>
    where
        T: SendMessage<HttpRequest<Vec<u8>>, Result<HttpResponse<Vec<u8>>, E>>,
        E: fmt::Display,
    {
        let url = format!("{}/", self.base_url);
        for attempt in 1..=self.poll_attempts {
            match self.send(self.request(&url, None)?) {
                Ok(response) if response.status().is_success() => {
                    info!("teamengine is ready at {}", self.base_url);
                    return Ok(());
                }
                Ok(response) => debug!(
                    "Attempt {}/{}: teamengine answered {}",
                    attempt,
                    self.poll_attempts,
                    response.status()
                ),
                Err(err) => debug!("Attempt {}/{}: {}", attempt, self.poll_attempts, err),
            }
            if attempt < self.poll_attempts {
                sleep(self.poll_interval);
            }
        }
        Err(Error::Unavailable {
            attempts: self.poll_attempts,
        })
    }

    /// Runs a suite and returns the raw report.
    ///
    /// Inputs become query parameters in the given order, repeated names included.
    pub fn execute_test_suite<E>(
        &self,
        suite_identifier: &str,
        inputs: &[(String, String)],
    ) -> Result<Vec<u8>, Error>
    where
        T: SendMessage<HttpRequest<Vec<u8>>, Result<HttpResponse<Vec<u8>>, E>>,
        E: fmt::Display,
    {
        let url = self.suite_url(suite_identifier, inputs)?;
        info!("Asking teamengine to execute test suite '{}'", suite_identifier);
        let response = self.send(self.request(url.as_str(), Some(XML_MEDIA_TYPE))?)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(response.body()).into_owned(),
            });
        }
        debug!("Test suite '{}' is done executing", suite_identifier);
        Ok(response.into_body())
    }
}

/// Writes the engine response to disk untouched.
pub fn persist_response(path: &Path, raw_report: &[u8]) -> Result<(), Error> {
    fs::write(path, raw_report).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;
    debug!("Wrote raw response to {}", path.display());
    Ok(())
}

pub fn render(
    result: &TestSuiteResult,
    details: &SerializationDetails,
    format: OutputFormat,
    config: &RenderConfig,
) -> Result<String, Error> {
    let output = match format {
        OutputFormat::Json => reporter::to_json(result, details, config)?,
        OutputFormat::Text => reporter::to_text(result, details, config)?,
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct FakeClient {
        replies: RefCell<VecDeque<Result<(u16, &'static str), String>>>,
        requests: RefCell<Vec<HttpRequest<Vec<u8>>>>,
    }

    impl FakeClient {
        fn new(replies: Vec<Result<(u16, &'static str), String>>) -> Self {
            Self {
                replies: RefCell::new(replies.into_iter().collect()),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl SendMessage<HttpRequest<Vec<u8>>, Result<HttpResponse<Vec<u8>>, String>> for FakeClient {
        fn send(&self, data: HttpRequest<Vec<u8>>) -> Result<HttpResponse<Vec<u8>>, String> {
            self.requests.borrow_mut().push(data);
            let (status, body) = self
                .replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err("connection refused".to_owned()))?;
            let mut response = HttpResponse::new(body.as_bytes().to_vec());
            *response.status_mut() = StatusCode::from_u16(status).unwrap();
            Ok(response)
        }
    }

    fn settings(poll_attempts: u32) -> Settings {
        Settings {
            poll_attempts,
            poll_interval: Duration::from_millis(0),
            ..Settings::default()
        }
    }

    #[test]
    fn test_waiting_stops_at_first_success() {
        let client = FakeClient::new(vec![
            Err("connection refused".to_owned()),
            Ok((503, "starting")),
            Ok((200, "ready")),
        ]);
        let app = App::new(client, "http://localhost:8080/teamengine/", &settings(5));
        assert!(app.wait_for_teamengine().is_ok());
        let requests = app.client.requests.borrow();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].uri(), "http://localhost:8080/teamengine/");
    }

    #[test]
    fn test_waiting_gives_up() {
        let client = FakeClient::new(vec![Ok((503, "starting")), Ok((503, "starting"))]);
        let app = App::new(client, "http://localhost:8080/teamengine", &settings(2));
        match app.wait_for_teamengine() {
            Err(Error::Unavailable { attempts }) => assert_eq!(attempts, 2),
            other => panic!("expected unavailability, got {:?}", other),
        }
        assert_eq!(app.client.requests.borrow().len(), 2);
    }

    #[test]
    fn test_zero_attempts_still_polls_once() {
        let client = FakeClient::new(vec![Ok((503, "starting"))]);
        let app = App::new(client, "http://localhost:8080/teamengine", &settings(0));
        match app.wait_for_teamengine() {
            Err(Error::Unavailable { attempts }) => assert_eq!(attempts, 1),
            other => panic!("expected unavailability, got {:?}", other),
        }
        assert_eq!(app.client.requests.borrow().len(), 1);
    }

    #[test]
    fn test_suite_identifier_stays_one_path_segment() {
        let client = FakeClient::new(vec![Ok((200, "<testng-results/>"))]);
        let app = App::new(client, "http://localhost:8080/teamengine/", &settings(1));
        app.execute_test_suite("../a/b c?", &[]).unwrap();
        assert_eq!(
            app.client.requests.borrow()[0].uri(),
            "http://localhost:8080/teamengine/rest/suites/..%2Fa%2Fb%20c%3F/run"
        );
    }

    #[test]
    fn test_suite_execution_request() {
        let client = FakeClient::new(vec![Ok((200, "<testng-results/>"))]);
        let app = App::new(client, "http://localhost:8080/teamengine", &settings(1));
        let inputs = vec![
            ("iut".to_owned(), "http://localhost:5000/".to_owned()),
            ("tag".to_owned(), "a".to_owned()),
            ("tag".to_owned(), "b".to_owned()),
        ];
        let raw = app.execute_test_suite("ogcapi-features-1.0", &inputs).unwrap();
        assert_eq!(raw, b"<testng-results/>".to_vec());

        let requests = app.client.requests.borrow();
        let request = &requests[0];
        assert_eq!(
            request.uri(),
            "http://localhost:8080/teamengine/rest/suites/ogcapi-features-1.0/run\
             ?iut=http%3A%2F%2Flocalhost%3A5000%2F&tag=a&tag=b"
        );
        assert_eq!(request.headers()[ACCEPT], "application/xml");
        assert_eq!(
            request.headers()[AUTHORIZATION],
            format!("Basic {}", base64::encode("ogctest:ogctest"))
        );
    }

    #[test]
    fn test_suite_execution_failure_status() {
        let client = FakeClient::new(vec![Ok((404, "no such suite"))]);
        let app = App::new(client, "http://localhost:8080/teamengine", &settings(1));
        match app.execute_test_suite("missing", &[]) {
            Err(Error::Status { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "no such suite");
            }
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[test]
    fn test_connection_failure() {
        let app = App::new(FakeClient::new(vec![]), "http://localhost:1", &settings(1));
        match app.execute_test_suite("s", &[]) {
            Err(Error::Connection(message)) => assert_eq!(message, "connection refused"),
            other => panic!("expected a connection error, got {:?}", other),
        }
    }
}
