use std::collections::HashMap;

use models::{HttpJsonParams, HttpMethod};
use reqwest::Client;
use serde_json::Value;

use crate::error::AutoscaleError;

/// Issues the configured request and extracts each requested statistic
/// via its dotted JSON path. Fails with [`AutoscaleError::UpstreamHttp`]
/// on a non-200 response. A path that resolves to a missing field or a
/// non-numeric value yields `None` for that alias rather than failing
/// the whole fetch.
pub async fn fetch_http_json(
    client: &Client,
    params: &HttpJsonParams,
) -> Result<HashMap<String, Option<f64>>, AutoscaleError> {
    let request = match params.method {
        HttpMethod::Get => client.get(&params.url),
        HttpMethod::Post => {
            let mut req = client.post(&params.url);
            if let Some(payload) = &params.payload {
                req = req.json(payload);
            }
            req
        }
    };

    let response = request
        .send()
        .await
        .map_err(|_| AutoscaleError::UpstreamHttp {
            status: 0,
            url: params.url.clone(),
        })?;

    if response.status().as_u16() != 200 {
        return Err(AutoscaleError::UpstreamHttp {
            status: response.status().as_u16(),
            url: params.url.clone(),
        });
    }

    let body: Value = response
        .json()
        .await
        .map_err(|_| AutoscaleError::UpstreamHttp {
            status: 200,
            url: params.url.clone(),
        })?;

    Ok(params
        .statistics
        .iter()
        .map(|stat| (stat.alias.clone(), dotted_path(&body, &stat.name)))
        .collect())
}

fn dotted_path(value: &Value, path: &str) -> Option<f64> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    current.as_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dotted_path_resolves_nested_field() {
        let body = json!({"data": {"usage": {"cpu": 12.5}}});
        assert_eq!(dotted_path(&body, "data.usage.cpu"), Some(12.5));
    }

    #[test]
    fn dotted_path_missing_segment_is_none() {
        let body = json!({"data": {}});
        assert_eq!(dotted_path(&body, "data.usage.cpu"), None);
    }
}
