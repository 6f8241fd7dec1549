use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    response::{IntoResponse, Response},
};
use http::{StatusCode, header};
use percent_encoding::percent_decode;

const BODY_FIELD: &[u8] = b"body";

/// The raw bytes of the submitted `body` field.
///
/// Posted values win over the query string and the first occurrence of a
/// repeated field is used. Urlencoded and multipart bodies are read; any
/// other content type is refused rather than saved as an empty page.
pub struct SaveBody(pub Vec<u8>);

impl<S> FromRequest<S> for SaveBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let from_query = req
            .uri()
            .query()
            .and_then(|query| first_value(query.as_bytes(), BODY_FIELD));

        let mime = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase());

        let posted = match mime.as_deref() {
            Some("application/x-www-form-urlencoded") => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                first_value(&bytes, BODY_FIELD)
            }
            Some("multipart/form-data") => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                first_multipart_value(multipart).await?
            }
            other => {
                tracing::debug!(content_type = ?other, "refusing save form");
                return Err(StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response());
            }
        };

        Ok(SaveBody(posted.or(from_query).unwrap_or_default()))
    }
}

async fn first_multipart_value(mut multipart: Multipart) -> Result<Option<Vec<u8>>, Response> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(IntoResponse::into_response)?
    {
        if field.name().map(str::as_bytes) == Some(BODY_FIELD) {
            let bytes = field.bytes().await.map_err(IntoResponse::into_response)?;
            return Ok(Some(bytes.to_vec()));
        }
    }
    Ok(None)
}

/// First value for `name` in an urlencoded string, decoded to raw bytes.
pub fn first_value(input: &[u8], name: &[u8]) -> Option<Vec<u8>> {
    input
        .split(|b| *b == b'&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (key, value) = match pair.iter().position(|b| *b == b'=') {
                Some(i) => (&pair[..i], &pair[i + 1..]),
                None => (pair, &pair[pair.len()..]),
            };
            (decode(key) == name).then(|| decode(value))
        })
}

// `+` is a space in form encoding, everything else is plain percent-decoding
fn decode(raw: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = raw
        .iter()
        .map(|b| if *b == b'+' { b' ' } else { *b })
        .collect();
    percent_decode(&spaced).collect()
}
