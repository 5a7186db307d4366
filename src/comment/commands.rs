// region:    --- Imports
use crate::auction::model::{check_length, Comment, NewComment, User, MAX_TEXT_LEN};
use crate::error::AuctionError;
use crate::store::AuctionStore;
use serde::{Deserialize, Serialize};
use tracing::info;
// endregion: --- Imports

/// 댓글 작성 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddCommentCommand {
    pub new_comment: String,
}

/// 댓글 작성
/// 작성자 제한은 없고 길이 제한만 확인한다.
pub async fn handle_add_comment(
    listing_id: i64,
    cmd: AddCommentCommand,
    author: &User,
    store: &dyn AuctionStore,
) -> Result<Comment, AuctionError> {
    info!(
        "{:<12} --> 댓글 작성 id: {}, author: {}",
        "Command", listing_id, author.username
    );
    check_length("new_comment", &cmd.new_comment, MAX_TEXT_LEN)?;

    store
        .add_comment(NewComment {
            listing_id,
            author_id: author.id,
            message: cmd.new_comment,
        })
        .await
}
