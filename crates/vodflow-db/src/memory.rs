use crate::catalog::{Catalog, CatalogError, CatalogResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;
use vodflow_core::models::{Ad, AdDescriptor, Tag, Video, VideoSnapshot, VideoUploadMetadata};

#[derive(Debug, Clone, Default)]
struct CatalogState {
    videos: HashMap<Uuid, Video>,
    ads: HashMap<Uuid, Ad>,
    tags: HashMap<String, Tag>,
    video_tags: Vec<(Uuid, String)>,
}

/// In-memory catalog for tests. Mutations build a modified clone of the whole
/// state and swap it in only on success, so a mid-operation failure leaves
/// nothing behind.
#[derive(Default)]
pub struct MemoryCatalog {
    state: Mutex<CatalogState>,
    fail_after_ads: AtomicBool,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a failure between the ad writes and the tag writes of the next
    /// `finalize` call.
    pub fn set_fail_after_ads(&self, fail: bool) {
        self.fail_after_ads.store(fail, Ordering::SeqCst);
    }

    /// (videos, ads, video_tags) row counts.
    pub fn counts(&self) -> (usize, usize, usize) {
        let state = self.state.lock().unwrap();
        (state.videos.len(), state.ads.len(), state.video_tags.len())
    }

    pub fn video_by_name(&self, video_name: &str) -> Option<Video> {
        let state = self.state.lock().unwrap();
        state
            .videos
            .values()
            .find(|v| v.video_name == video_name)
            .cloned()
    }

    fn snapshot_of(state: &CatalogState, video: &Video) -> VideoSnapshot {
        let tags = state
            .video_tags
            .iter()
            .filter(|(vid, _)| *vid == video.video_id)
            .filter_map(|(_, tag_id)| state.tags.get(tag_id).cloned())
            .collect();
        let ads = state
            .ads
            .values()
            .filter(|ad| ad.video_id == video.video_id)
            .cloned()
            .collect();
        VideoSnapshot::assemble(video, tags, ads)
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn finalize(
        &self,
        seller_id: &str,
        metadata: &VideoUploadMetadata,
        video_url: &str,
        thumbnail_url: &str,
    ) -> CatalogResult<VideoSnapshot> {
        let mut state = self.state.lock().unwrap();
        let mut next = state.clone();

        let video = Video::new(
            &metadata.video_name,
            video_url,
            thumbnail_url,
            seller_id,
            &metadata.seller_name,
        );
        next.videos.insert(video.video_id, video.clone());

        for descriptor in &metadata.ads {
            let ad = Ad::new(video.video_id, descriptor);
            next.ads.insert(ad.ad_id, ad);
        }

        if self.fail_after_ads.swap(false, Ordering::SeqCst) {
            return Err(CatalogError::Finalization(
                "injected failure after ad writes".to_string(),
            ));
        }

        for tag_id in &metadata.tag_ids {
            if !next.tags.contains_key(tag_id) {
                return Err(CatalogError::TagNotFound(tag_id.clone()));
            }
            next.video_tags.push((video.video_id, tag_id.clone()));
        }

        let snapshot = Self::snapshot_of(&next, &video);
        *state = next;
        Ok(snapshot)
    }

    async fn update_tags(
        &self,
        seller_id: &str,
        video_id: Uuid,
        tag_ids: &[String],
    ) -> CatalogResult<VideoSnapshot> {
        let mut state = self.state.lock().unwrap();
        let mut next = state.clone();

        let video = match next.videos.get_mut(&video_id) {
            Some(v) if v.seller_id == seller_id => v,
            _ => return Err(CatalogError::NotFound(video_id.to_string())),
        };
        video.updated_at = Utc::now();
        let video = video.clone();

        for tag_id in tag_ids {
            if !next.tags.contains_key(tag_id) {
                return Err(CatalogError::TagNotFound(tag_id.clone()));
            }
        }

        next.video_tags.retain(|(vid, _)| *vid != video_id);
        for tag_id in tag_ids {
            next.video_tags.push((video_id, tag_id.clone()));
        }

        let snapshot = Self::snapshot_of(&next, &video);
        *state = next;
        Ok(snapshot)
    }

    async fn update_ads(
        &self,
        seller_id: &str,
        video_id: Uuid,
        ads: &[AdDescriptor],
    ) -> CatalogResult<VideoSnapshot> {
        let mut state = self.state.lock().unwrap();
        let mut next = state.clone();

        let video = match next.videos.get_mut(&video_id) {
            Some(v) if v.seller_id == seller_id => v,
            _ => return Err(CatalogError::NotFound(video_id.to_string())),
        };
        video.updated_at = Utc::now();
        let video = video.clone();

        next.ads.retain(|_, ad| ad.video_id != video_id);
        for descriptor in ads {
            let ad = Ad::new(video_id, descriptor);
            next.ads.insert(ad.ad_id, ad);
        }

        let snapshot = Self::snapshot_of(&next, &video);
        *state = next;
        Ok(snapshot)
    }

    async fn insert_tag(&self, tag: &Tag) -> CatalogResult<()> {
        let mut state = self.state.lock().unwrap();
        state.tags.insert(tag.tag_id.clone(), tag.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(tag_ids: Vec<&str>) -> VideoUploadMetadata {
        VideoUploadMetadata {
            video_name: "trip".to_string(),
            seller_name: "acme".to_string(),
            ads: vec![AdDescriptor {
                ad_url: "https://ads.example/a1".to_string(),
                start_time: 0,
                end_time: 15,
            }],
            tag_ids: tag_ids.into_iter().map(String::from).collect(),
        }
    }

    async fn seed_tag(catalog: &MemoryCatalog, tag_id: &str) {
        catalog
            .insert_tag(&Tag {
                tag_id: tag_id.to_string(),
                tag_name: format!("{} name", tag_id),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_finalize_writes_full_graph() {
        let catalog = MemoryCatalog::new();
        seed_tag(&catalog, "t1").await;

        let snapshot = catalog
            .finalize("u1", &metadata(vec!["t1"]), "http://cdn/v", "http://cdn/t")
            .await
            .unwrap();

        assert_eq!(snapshot.seller_id, "u1");
        assert_eq!(snapshot.ads.len(), 1);
        assert_eq!(snapshot.tags.len(), 1);
        assert_eq!(catalog.counts(), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_unknown_tag_leaves_no_partial_rows() {
        let catalog = MemoryCatalog::new();

        let err = catalog
            .finalize("u1", &metadata(vec!["missing"]), "http://cdn/v", "http://cdn/t")
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::TagNotFound(_)));
        assert_eq!(catalog.counts(), (0, 0, 0));
    }

    #[tokio::test]
    async fn test_injected_failure_after_ads_is_atomic() {
        let catalog = MemoryCatalog::new();
        seed_tag(&catalog, "t1").await;
        catalog.set_fail_after_ads(true);

        let err = catalog
            .finalize("u1", &metadata(vec!["t1"]), "http://cdn/v", "http://cdn/t")
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Finalization(_)));
        assert_eq!(catalog.counts(), (0, 0, 0));

        // Failpoint is one-shot; the retry goes through.
        catalog
            .finalize("u1", &metadata(vec!["t1"]), "http://cdn/v", "http://cdn/t")
            .await
            .unwrap();
        assert_eq!(catalog.counts(), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_update_tags_replaces_set() {
        let catalog = MemoryCatalog::new();
        seed_tag(&catalog, "t1").await;
        seed_tag(&catalog, "t2").await;

        let snapshot = catalog
            .finalize("u1", &metadata(vec!["t1"]), "http://cdn/v", "http://cdn/t")
            .await
            .unwrap();

        let updated = catalog
            .update_tags("u1", snapshot.video_id, &["t2".to_string()])
            .await
            .unwrap();

        assert_eq!(updated.tags.len(), 1);
        assert_eq!(updated.tags[0].tag_id, "t2");
    }

    #[tokio::test]
    async fn test_update_tags_unknown_tag_keeps_original_set() {
        let catalog = MemoryCatalog::new();
        seed_tag(&catalog, "t1").await;

        let snapshot = catalog
            .finalize("u1", &metadata(vec!["t1"]), "http://cdn/v", "http://cdn/t")
            .await
            .unwrap();

        let err = catalog
            .update_tags("u1", snapshot.video_id, &["missing".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::TagNotFound(_)));

        // Original tag set is untouched.
        assert_eq!(catalog.counts(), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_update_scoped_to_owner() {
        let catalog = MemoryCatalog::new();
        seed_tag(&catalog, "t1").await;

        let snapshot = catalog
            .finalize("u1", &metadata(vec!["t1"]), "http://cdn/v", "http://cdn/t")
            .await
            .unwrap();

        let err = catalog
            .update_ads("u2", snapshot.video_id, &[])
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NotFound(_)));
    }
}
