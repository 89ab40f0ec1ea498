//! Shared HTTP body -> [`LineStream`] adapter.

use futures_util::TryStreamExt;
use reqwest::Response;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_stream::wrappers::SplitStream;
use tokio_util::io::StreamReader;

use crate::provider::LineStream;

/// Split a streaming [`Response`] body into lines as bytes arrive.
pub fn line_stream_from_response(response: Response) -> LineStream {
    let body = response.bytes_stream().map_err(std::io::Error::other);
    line_stream_from_reader(StreamReader::new(body))
}

/// Split any buffered reader into a [`LineStream`].
///
/// Lines are split on raw bytes; invalid UTF-8 is replaced rather than
/// reported as a read error, so a garbled event only spoils its own line.
pub fn line_stream_from_reader<R>(reader: R) -> LineStream
where
    R: AsyncBufRead + Send + 'static,
{
    let segments = SplitStream::new(Box::pin(reader).split(b'\n'));
    Box::pin(segments.map_ok(|segment| decode_line(&segment)))
}

fn decode_line(segment: &[u8]) -> String {
    let line = segment.strip_suffix(b"\r").unwrap_or(segment);
    String::from_utf8_lossy(line).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn network_tests_disabled() -> bool {
        std::env::var_os("CODEX_SANDBOX_NETWORK_DISABLED").is_some()
    }

    #[tokio::test]
    async fn reader_lines_strip_newlines() {
        let reader: &'static [u8] = b"data: one\n\ndata: two\r\nlast";
        let lines: Vec<String> = line_stream_from_reader(reader)
            .map(|line| line.unwrap())
            .collect()
            .await;

        assert_eq!(lines, vec!["data: one", "", "data: two", "last"]);
    }

    #[tokio::test]
    async fn invalid_utf8_line_is_skipped_not_fatal() {
        let body: &'static [u8] = b"data: {\"choices\":[{\"delta\":{\"content\":\"A\"}}]}\n\
data: \xff\xfe\n\
data: {\"choices\":[{\"delta\":{\"content\":\"B\"}}]}\n\
data: [DONE]\n";
        let mut ignore = |_: crate::StreamSignal<'_>| {};

        let turn = crate::decode_stream(line_stream_from_reader(body), &mut ignore)
            .await
            .unwrap();

        assert_eq!(turn.content, "AB");
        assert_eq!(turn.malformed_events, 1);
    }

    #[tokio::test]
    async fn response_body_is_split_into_lines() {
        if network_tests_disabled() {
            return;
        }

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sse"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string("data: {\"a\":1}\n\ndata: [DONE]\n\n"),
            )
            .mount(&mock_server)
            .await;

        let response = reqwest::get(format!("{}/sse", mock_server.uri()))
            .await
            .unwrap();
        let lines: Vec<String> = line_stream_from_response(response)
            .map(|line| line.unwrap())
            .collect()
            .await;

        assert_eq!(lines, vec!["data: {\"a\":1}", "", "data: [DONE]", ""]);
    }
}
