//! プロセス内で共有するプロバイダーの置き場
//!
//! 最初のアクセスでプロバイダーを作り、`reset` で破棄する（設定変更後など）。
//! アクセスは 1 つの非同期ロックで直列化される。

use std::sync::Arc;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tracing::info;

use crate::api::TrackerApi;
use crate::client::JiraClient;
use crate::provider::JiraProvider;
use crate::settings::{SettingsEditor, SettingsStore};

type Factory<A> = Box<dyn Fn() -> JiraProvider<A> + Send + Sync>;

pub struct ProviderRegistry<A: TrackerApi = JiraClient> {
    slot: Mutex<Option<JiraProvider<A>>>,
    factory: Factory<A>,
}

impl ProviderRegistry<JiraClient> {
    /// 設定ストアとエディタからプロバイダーを作るレジストリ
    pub fn from_settings(store: Arc<dyn SettingsStore>, editor: Arc<dyn SettingsEditor>) -> Self {
        Self::new(move || JiraProvider::open(store.as_ref(), editor.as_ref()))
    }
}

impl<A: TrackerApi> ProviderRegistry<A> {
    pub fn new(factory: impl Fn() -> JiraProvider<A> + Send + Sync + 'static) -> Self {
        Self {
            slot: Mutex::new(None),
            factory: Box::new(factory),
        }
    }

    /// プロバイダーを取得する。無ければここで作る
    pub async fn provider(&self) -> MappedMutexGuard<'_, JiraProvider<A>> {
        let guard = self.slot.lock().await;
        MutexGuard::map(guard, |slot| {
            slot.get_or_insert_with(|| {
                info!("Creating JIRA provider");
                (self.factory)()
            })
        })
    }

    pub async fn is_initialized(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// 現在のプロバイダーを閉じて破棄する。次のアクセスで作り直される
    pub async fn reset(&self) {
        let previous = self.slot.lock().await.take();
        if let Some(mut provider) = previous {
            info!("Discarding JIRA provider");
            provider.close().await;
        }
    }
}
