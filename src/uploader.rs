//! 上传与编辑表单
//!
//! 客户端只做表面校验（标题非空、长度），其余交给后端。

use crate::api::VidShareApi;
use crate::error::{ApiError, ApiResult};
use crate::request::HttpClient;
use vidshare_shared::MAX_TITLE_LEN;
use vidshare_shared::protocol::CreateUploadRequest;

fn validate_title(title: &str) -> ApiResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::validation("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ApiError::validation(format!(
            "Title must not exceed {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub title: String,
    pub description: String,
    pub is_private: bool,
}

/// 上传组件使用的直传地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    pub upload_id: String,
    pub url: String,
}

impl UploadForm {
    pub fn validate(&self) -> ApiResult<CreateUploadRequest> {
        Ok(CreateUploadRequest {
            title: validate_title(&self.title)?,
            description: self.description.trim().to_string(),
            is_private: self.is_private,
        })
    }

    /// 以表单元数据向后端申请上传地址
    pub async fn request_endpoint<C: HttpClient>(&self, api: &VidShareApi<C>) -> ApiResult<UploadTicket> {
        let request = self.validate()?;
        let endpoint = api.create_upload(&request).await?;
        tracing::info!(upload_id = %endpoint.data.id, private = request.is_private, "upload endpoint created");
        Ok(UploadTicket {
            upload_id: endpoint.data.id,
            url: endpoint.data.url,
        })
    }
}

/// 编辑已有视频的标题与描述
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoEdit {
    pub title: String,
    pub description: String,
}

impl VideoEdit {
    pub fn validate(&self) -> ApiResult<VideoEdit> {
        Ok(VideoEdit {
            title: validate_title(&self.title)?,
            description: self.description.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{HttpMethod, MockHttpClient};
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn title_is_required_and_bounded() {
        let form = UploadForm {
            title: "   ".to_string(),
            ..UploadForm::default()
        };
        assert_eq!(form.validate().unwrap_err().to_string(), "Title is required");

        let form = UploadForm {
            title: "t".repeat(41),
            ..UploadForm::default()
        };
        assert_matches!(form.validate(), Err(ApiError::Validation(_)));

        let edit = VideoEdit {
            title: " New title ".to_string(),
            description: " d ".to_string(),
        };
        assert_eq!(
            edit.validate().unwrap(),
            VideoEdit {
                title: "New title".to_string(),
                description: "d".to_string()
            }
        );
    }

    #[tokio::test]
    async fn endpoint_is_scoped_to_metadata() {
        let mock = MockHttpClient::new();
        mock.mock_response(
            HttpMethod::Post,
            "http://api.test/mux/upload",
            201,
            json!({ "data": { "id": "up1", "url": "https://storage.example/upload/up1", "status": "waiting" } }),
        );
        let api = VidShareApi::new(&mock, "http://api.test").with_token(Some("jwt".to_string()));

        let form = UploadForm {
            title: "Test Clip".to_string(),
            description: "first upload".to_string(),
            is_private: false,
        };
        let ticket = form.request_endpoint(&api).await.unwrap();
        assert_eq!(ticket.url, "https://storage.example/upload/up1");

        let (_, _, _, body) = mock.last_request().unwrap();
        let body: serde_json::Value = serde_json::from_str(&body.unwrap()).unwrap();
        assert_eq!(
            body,
            json!({ "title": "Test Clip", "description": "first upload", "isPrivate": false })
        );
    }

    #[tokio::test]
    async fn invalid_form_never_requests_endpoint() {
        let mock = MockHttpClient::new();
        let api = VidShareApi::new(&mock, "http://api.test").with_token(Some("jwt".to_string()));
        assert!(UploadForm::default().request_endpoint(&api).await.is_err());
        assert_eq!(mock.request_count(), 0);
    }
}
