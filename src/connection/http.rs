use crate::connection::SendMessage;
use http::Request as HttpRequest;
use http::Response as HttpResponse;
use reqwest::blocking::Client;
use reqwest::blocking::Request;
use reqwest::Error as RequestError;
use std::convert::TryFrom;
use std::time::Duration;

pub fn client(timeout: Duration) -> Result<Client, RequestError> {
    Client::builder().timeout(timeout).build()
}

impl SendMessage<HttpRequest<Vec<u8>>, Result<HttpResponse<Vec<u8>>, RequestError>> for Client {
    fn send(&self, data: HttpRequest<Vec<u8>>) -> Result<HttpResponse<Vec<u8>>, RequestError> {
        let request = Request::try_from(data)?;
        let response = self.execute(request)?;
        let status = response.status();
        let mut reply = HttpResponse::new(response.bytes()?.to_vec());
        *reply.status_mut() = status;
        Ok(reply)
    }
}
