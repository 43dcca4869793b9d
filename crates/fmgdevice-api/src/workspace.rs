// ADOM workspace endpoints
//
// With workspace mode enabled, FortiManager rejects configuration writes
// unless the ADOM is locked by the session. Changes become visible to
// other administrators only after a commit.

use tracing::debug;

use crate::client::FmgClient;
use crate::error::Error;

impl FmgClient {
    /// `exec /dvmdb/adom/{adom}/workspace/lock`
    pub async fn lock_adom(&self, adom: &str) -> Result<(), Error> {
        debug!(adom, "locking ADOM workspace");
        self.exec(&format!("/dvmdb/adom/{adom}/workspace/lock"), None)
            .await
            .map(|_| ())
    }

    /// `exec /dvmdb/adom/{adom}/workspace/commit`
    pub async fn commit_adom(&self, adom: &str) -> Result<(), Error> {
        debug!(adom, "committing ADOM workspace");
        self.exec(&format!("/dvmdb/adom/{adom}/workspace/commit"), None)
            .await
            .map(|_| ())
    }

    /// `exec /dvmdb/adom/{adom}/workspace/unlock`
    pub async fn unlock_adom(&self, adom: &str) -> Result<(), Error> {
        debug!(adom, "unlocking ADOM workspace");
        self.exec(&format!("/dvmdb/adom/{adom}/workspace/unlock"), None)
            .await
            .map(|_| ())
    }
}
