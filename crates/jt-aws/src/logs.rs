use async_trait::async_trait;
use jt_core::{LogApi, PlatformError};
use jt_model::{LogPage, LogQuery};

use crate::{AwsPlatform, classify::classify};

#[async_trait]
impl LogApi for AwsPlatform {
    async fn get_log_events(&self, query: &LogQuery) -> Result<LogPage, PlatformError> {
        let limit = i32::try_from(query.limit).unwrap_or(i32::MAX);
        let out = self
            .logs
            .get_log_events()
            .log_group_name(&query.stream.group)
            .log_stream_name(&query.stream.name)
            .limit(limit)
            .start_from_head(true)
            .set_next_token(query.next_token.clone())
            .send()
            .await
            .map_err(|e| classify("get-log-events", e))?;

        Ok(LogPage {
            events: out
                .events()
                .iter()
                .filter_map(|e| e.message().map(str::to_owned))
                .collect(),
            next_forward_token: out.next_forward_token().map(str::to_owned),
        })
    }
}
