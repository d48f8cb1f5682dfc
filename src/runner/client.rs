use thiserror::Error;
use url::Url;

use crate::quiz::Question;
use crate::server::SPREADSHEET_ID_PARAM;

pub const UNAVAILABLE_MESSAGE: &str = "Quiz not found or no longer active";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid quiz URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("'{0}' is not a quiz URL")]
    NotAQuizUrl(String),
    #[error("Spreadsheet ID is missing")]
    MissingSpreadsheetId,
    #[error("{}", UNAVAILABLE_MESSAGE)]
    Unavailable,
    #[error("could not reach the quiz server: {0}")]
    Request(#[from] reqwest::Error),
}

/// Maps a shareable `/quiz/<name>?spreadsheetId=<id>` URL onto the
/// question endpoint of the same server. The quiz name is forwarded
/// exactly as it appears in the URL.
pub fn questions_endpoint(quiz_url: &str) -> Result<Url, ClientError> {
    let url = Url::parse(quiz_url)?;
    let not_a_quiz = || ClientError::NotAQuizUrl(quiz_url.to_owned());

    let segments: Vec<&str> = url.path_segments().ok_or_else(not_a_quiz)?.collect();
    let quiz_name = match segments.as_slice() {
        [.., "quiz", name] if !name.is_empty() => name.to_string(),
        _ => return Err(not_a_quiz()),
    };

    let spreadsheet_id = url
        .query_pairs()
        .find(|(key, _)| key == SPREADSHEET_ID_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .ok_or(ClientError::MissingSpreadsheetId)?;

    let mut endpoint = url.clone();
    endpoint.set_path(&format!("/api/questions/{}", quiz_name));
    endpoint.set_query(None);
    endpoint
        .query_pairs_mut()
        .append_pair(SPREADSHEET_ID_PARAM, &spreadsheet_id);
    Ok(endpoint)
}

pub async fn fetch_questions(
    http: &reqwest::Client,
    quiz_url: &str,
) -> Result<Vec<Question>, ClientError> {
    let endpoint = questions_endpoint(quiz_url)?;
    tracing::debug!(%endpoint, "fetching questions");
    let response = http.get(endpoint).send().await?;
    if !response.status().is_success() {
        tracing::debug!(status = %response.status(), "question request failed");
        return Err(ClientError::Unavailable);
    }
    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(
        "http://localhost:3000/quiz/Quiz1?spreadsheetId=abc",
        "http://localhost:3000/api/questions/Quiz1?spreadsheetId=abc"
    )]
    #[case(
        "https://quiz.example.com/quiz/My%20Quiz?spreadsheetId=abc-_1",
        "https://quiz.example.com/api/questions/My%20Quiz?spreadsheetId=abc-_1"
    )]
    #[case(
        "http://localhost:3000/quiz/Quiz1?other=1&spreadsheetId=abc",
        "http://localhost:3000/api/questions/Quiz1?spreadsheetId=abc"
    )]
    fn maps_quiz_url_to_endpoint(#[case] quiz_url: &str, #[case] expected: &str) {
        assert_eq!(questions_endpoint(quiz_url).unwrap().as_str(), expected);
    }

    #[test]
    fn requires_spreadsheet_id() {
        assert!(matches!(
            questions_endpoint("http://localhost:3000/quiz/Quiz1"),
            Err(ClientError::MissingSpreadsheetId)
        ));
        assert!(matches!(
            questions_endpoint("http://localhost:3000/quiz/Quiz1?spreadsheetId="),
            Err(ClientError::MissingSpreadsheetId)
        ));
    }

    #[rstest]
    #[case("http://localhost:3000/admin")]
    #[case("http://localhost:3000/quiz/")]
    fn rejects_non_quiz_urls(#[case] quiz_url: &str) {
        assert!(matches!(
            questions_endpoint(quiz_url),
            Err(ClientError::NotAQuizUrl(_))
        ));
    }

    #[test]
    fn rejects_unparsable_urls() {
        assert!(matches!(
            questions_endpoint("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
