//! Chat avatar rendering shared by the hero and the enemies.

use std::cell::Cell;
#[cfg(target_arch = "wasm32")]
use std::f64::consts::PI;
use std::rc::Rc;

use web_sys::CanvasRenderingContext2d;

use crate::profile::DisplayableProfile;
use crate::stage::ActorBody;

const CAPTION_FONT: &str = "16px 'Arial'";

/// A profile picture plus its name caption. The image loads asynchronously;
/// the owning actor stays invisible until [`AvatarSprite::ready`] turns true.
pub struct AvatarSprite {
    name: String,
    #[cfg(target_arch = "wasm32")]
    image: Option<web_sys::HtmlImageElement>,
    loaded: Rc<Cell<bool>>,
    #[cfg(target_arch = "wasm32")]
    _onload: Option<wasm_bindgen::prelude::Closure<dyn FnMut()>>,
}

impl AvatarSprite {
    /// Start loading the profile's picture. Falls back to a caption-only
    /// sprite when no image element can be created.
    #[cfg(target_arch = "wasm32")]
    pub fn for_profile(profile: &DisplayableProfile) -> Self {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::prelude::Closure;

        let Ok(image) = web_sys::HtmlImageElement::new() else {
            log::warn!("could not create an image element for {}", profile.display_name);
            return Self::caption_only(&profile.display_name);
        };

        let loaded = Rc::new(Cell::new(false));
        let flag = loaded.clone();
        let onload = Closure::wrap(Box::new(move || {
            flag.set(true);
        }) as Box<dyn FnMut()>);
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_src(&profile.avatar_url);

        Self {
            name: profile.display_name.clone(),
            image: Some(image),
            loaded,
            _onload: Some(onload),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn for_profile(profile: &DisplayableProfile) -> Self {
        Self::caption_only(&profile.display_name)
    }

    /// Sprite without a picture; immediately ready. Headless platforms and
    /// tests take this path.
    pub fn caption_only(name: &str) -> Self {
        Self {
            name: name.to_string(),
            #[cfg(target_arch = "wasm32")]
            image: None,
            loaded: Rc::new(Cell::new(true)),
            #[cfg(target_arch = "wasm32")]
            _onload: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ready(&self) -> bool {
        self.loaded.get()
    }

    /// Draw the picture clipped to a circle, with the name centered below.
    pub fn draw(&self, ctx: &CanvasRenderingContext2d, body: &ActorBody) {
        let radius = body.width / 2.0;

        #[cfg(target_arch = "wasm32")]
        if let Some(image) = self.image.as_ref().filter(|_| self.loaded.get()) {
            ctx.save();
            ctx.begin_path();
            let _ = ctx.arc(body.x + radius, body.y + radius, radius, 0.0, PI * 2.0);
            ctx.clip();
            let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                image, body.x, body.y, body.width, body.height,
            );
            ctx.restore();
        }

        ctx.set_font(CAPTION_FONT);
        ctx.set_text_align("center");
        ctx.set_fill_style_str("#fff");
        let _ = ctx.fill_text(&self.name, body.x + radius, body.y + body.height + 20.0);
    }
}
