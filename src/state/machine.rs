//! Banner conversation state machine
//!
//! Each incoming message is one turn. The turn reads the session state,
//! calls into the catalog or the banner pipeline as needed, mutates the
//! session and returns a [`Reply`]. Turns never fail: every error is turned
//! into a reply at this boundary.
//!
//! ```text
//! START --name--> ASK_IMAGE --index--> COLLECT_TEXT --headline--> COLLECT_TEXT
//!   ^                 |  ^  (re-search)                               |
//!   |   no matches    |  +--------------+                      description
//!   +-----------------+                                               |
//!   +------------------- legible banner ------------------------------+
//! ```

use std::time::Instant;
use tracing::{debug, error, info};
use crate::models::Reply;
use crate::services::ServiceFactory;
use crate::utils::helpers::looks_like_selection;
use crate::utils::logging::log_pipeline_stage;
use super::replies;
use super::session::{FlowState, Session};

/// Drives the banner conversation for one session at a time
#[derive(Clone)]
pub struct BannerFlow {
    services: ServiceFactory,
}

impl BannerFlow {
    pub fn new(services: ServiceFactory) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &ServiceFactory {
        &self.services
    }

    /// Handle one message against `session`
    ///
    /// Callers must hold the session exclusively for the whole turn.
    pub async fn handle_turn(&self, session: &mut Session, message: &str) -> Reply {
        let message = message.trim();
        let from = session.state;

        let reply = match session.state {
            FlowState::Start => self.on_start(session, message).await,
            FlowState::AskImage => self.on_ask_image(session, message).await,
            FlowState::CollectText => self.on_collect_text(session, message).await,
        };

        session.touch();
        debug!(from_state = %from, to_state = %session.state, "Turn complete");
        reply
    }

    async fn on_start(&self, session: &mut Session, message: &str) -> Reply {
        if message.is_empty() {
            return Reply::text(replies::ASK_PRODUCT_NAME);
        }

        info!(product_name = message, "Product name set");
        session.product_name = Some(message.to_string());

        let images = self.services.catalog.find_images(Some(message)).await;
        if images.is_empty() {
            session.reset();
            return Reply::text(replies::NO_MATCHING_PRODUCTS);
        }

        self.offer_images(session, images)
    }

    async fn on_ask_image(&self, session: &mut Session, message: &str) -> Reply {
        if looks_like_selection(message) {
            let chosen = message
                .parse::<usize>()
                .ok()
                .filter(|index| (1..=session.candidate_images.len()).contains(index))
                .map(|index| session.candidate_images[index - 1].clone());

            let Some(filename) = chosen else {
                debug!(input = message, candidates = session.candidate_images.len(), "Selection out of range");
                return Reply::text(replies::INVALID_SELECTION);
            };

            let path = self.services.catalog.image_path(&filename);
            info!(image = %path.display(), "Image selected");
            session.selected_image_path = Some(path);
            session.headline = None;
            session.description = None;
            session.state = FlowState::CollectText;
            return Reply::text(replies::IMAGE_SELECTED);
        }

        // A non-index message narrows the listing; product_name is kept as typed at START
        let keyword = if message.is_empty() {
            session.product_name.clone()
        } else {
            Some(message.to_string())
        };

        let images = self.services.catalog.find_images(keyword.as_deref()).await;
        if images.is_empty() {
            session.reset();
            return Reply::text(replies::NO_IMAGES_FOUND);
        }

        self.offer_images(session, images)
    }

    fn offer_images(&self, session: &mut Session, images: Vec<String>) -> Reply {
        let refs = self.services.catalog.enumerate(&images);
        session.candidate_images = images;
        session.state = FlowState::AskImage;
        Reply::with_images(replies::MATCHING_PRODUCTS, refs)
    }

    async fn on_collect_text(&self, session: &mut Session, message: &str) -> Reply {
        if session.headline.is_none() {
            if message.is_empty() {
                return Reply::text(replies::ASK_HEADLINE);
            }
            info!(headline = message, "Headline set");
            session.headline = Some(message.to_string());
            return Reply::text(replies::GOT_HEADLINE);
        }

        if message.is_empty() {
            return Reply::text(replies::ASK_DESCRIPTION);
        }
        info!(description = message, "Description set");
        session.description = Some(message.to_string());

        self.generate_banner(session).await
    }

    /// Run analyze -> composite -> critique for the session's current text
    async fn generate_banner(&self, session: &mut Session) -> Reply {
        let (Some(image_path), Some(headline), Some(description)) = (
            session.selected_image_path.clone(),
            session.headline.clone(),
            session.description.clone(),
        ) else {
            error!(state = %session.state, "Banner requested without image and text, starting over");
            session.reset();
            return Reply::text(replies::ASK_PRODUCT_NAME);
        };

        let started = Instant::now();
        let layout = match self.services.layout_analyzer.analyze(&image_path).await {
            Ok(layout) => {
                log_pipeline_stage("analyze", started.elapsed(), true);
                layout
            }
            Err(e) => {
                log_pipeline_stage("analyze", started.elapsed(), false);
                error!(error = %e, image = %image_path.display(), "Image analysis failed");
                session.description = None;
                return Reply::text(replies::ANALYSIS_FAILED);
            }
        };

        let started = Instant::now();
        let banner = match self
            .services
            .compositor
            .composite(&image_path, &headline, &description, &layout)
            .await
        {
            Ok(banner) => {
                log_pipeline_stage("composite", started.elapsed(), true);
                banner
            }
            Err(e) => {
                log_pipeline_stage("composite", started.elapsed(), false);
                error!(error = %e, "Banner generation failed");
                session.description = None;
                return Reply::text(replies::BANNER_FAILED);
            }
        };

        let started = Instant::now();
        let critique = self.services.critic.critique_or_default(&banner.base64).await;
        log_pipeline_stage("critique", started.elapsed(), true);

        if critique.is_legible {
            info!(saved_path = %banner.saved_path, "Banner accepted");
            session.reset();
            return Reply::with_banner(replies::BANNER_GENERATED, banner);
        }

        info!(critique = %critique.critique, "Banner text not legible, asking for new description");
        session.description = None;
        if critique.critique.is_empty() {
            Reply::text(replies::NOT_LEGIBLE)
        } else {
            Reply::text(format!("{}\n{}", replies::NOT_LEGIBLE, critique.critique))
        }
    }
}
