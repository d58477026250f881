//! # Graphics Resources Builder
//!
//! This module creates the window, the software presentation surface and the texture atlas.
//! The window and surface are created synchronously; the atlas is loaded asynchronously
//! (from disk on native targets, over HTTP in the browser) and the finished resources are
//! handed back to the event loop as a user event.
//!
//! The main components are:
//! - `Graphics`: Holds all graphics-related resources
//! - `GraphicsBuilder`: Helper for asynchronous graphics initialization
//! - `MaybeGraphics`: Represents the various states of graphics initialization

use std::{fmt, future::Future, sync::Arc};

use log::error;
use softbuffer::{Context, SoftBufferError, Surface};
use winit::{
    error::OsError,
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

use crate::engine_state::rendering::texture::TextureAtlas;

#[cfg(target_family = "wasm")]
use crate::CANVAS_ID;

/// Surface that presents `0x00RRGGBB` frames to the window.
pub type WindowSurface = Surface<Arc<Window>, Arc<Window>>;

/// Contains all graphics-related resources required by the application.
pub struct Graphics {
    pub window: Arc<Window>,
    /// Kept alive for as long as the surface is used
    pub context: Context<Arc<Window>>,
    pub surface: WindowSurface,
    /// The decoded atlas, or `None` if it could not be loaded
    pub atlas: Option<TextureAtlas>,
}

/// Errors raised while creating the window or its surface.
#[derive(Debug)]
pub enum GraphicsError {
    Window(OsError),
    Surface(SoftBufferError),
    /// The canvas element to draw into is missing from the page
    #[cfg_attr(not(target_family = "wasm"), allow(dead_code))]
    Canvas(String),
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::Window(e) => write!(f, "could not create window: {}", e),
            GraphicsError::Surface(e) => write!(f, "could not create surface: {}", e),
            GraphicsError::Canvas(id) => write!(f, "no canvas element with id {:?}", id),
        }
    }
}

impl std::error::Error for GraphicsError {}

impl From<OsError> for GraphicsError {
    fn from(e: OsError) -> Self {
        GraphicsError::Window(e)
    }
}

impl From<SoftBufferError> for GraphicsError {
    fn from(e: SoftBufferError) -> Self {
        GraphicsError::Surface(e)
    }
}

/// Creates the window and surface and starts loading the atlas.
///
/// # Arguments
/// * `event_loop` - The active event loop used to create the window
/// * `atlas_source` - Atlas path on native targets, URL in the browser
/// * `size` - Initial inner size of a native window
///
/// # Returns
/// A `Future` that resolves to the initialized `Graphics` once the atlas is loaded
fn create_graphics(
    event_loop: &ActiveEventLoop,
    atlas_source: String,
    size: (u32, u32),
) -> Result<impl Future<Output = Graphics> + 'static, GraphicsError> {
    #[allow(unused_mut)]
    let mut window_attrs = Window::default_attributes().with_title("voxel-canvas");

    #[cfg(not(target_family = "wasm"))]
    {
        window_attrs = window_attrs.with_inner_size(winit::dpi::PhysicalSize::new(size.0, size.1));
    }

    #[cfg(target_family = "wasm")]
    {
        use web_sys::wasm_bindgen::JsCast;
        use winit::platform::web::WindowAttributesExtWebSys;

        let _ = size;
        let canvas = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(CANVAS_ID))
            .ok_or_else(|| GraphicsError::Canvas(CANVAS_ID.to_string()))?;
        window_attrs = window_attrs.with_canvas(Some(canvas.unchecked_into()));
    }

    let window = Arc::new(event_loop.create_window(window_attrs)?);
    let context = Context::new(window.clone())?;
    let surface = Surface::new(&context, window.clone())?;
    log::info!("Created window with a {:?} surface", window.inner_size());

    Ok(async move {
        let atlas = load_atlas(atlas_source).await;
        Graphics {
            window,
            context,
            surface,
            atlas,
        }
    })
}

#[cfg(not(target_family = "wasm"))]
async fn load_atlas(path: String) -> Option<TextureAtlas> {
    match TextureAtlas::from_file(&path) {
        Ok(atlas) => {
            log::info!("Loaded texture atlas from {}", path);
            Some(atlas)
        }
        Err(e) => {
            error!("Failed to load texture atlas {}: {}", path, e);
            None
        }
    }
}

#[cfg(target_family = "wasm")]
async fn load_atlas(url: String) -> Option<TextureAtlas> {
    let bytes = match fetch_bytes(&url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Error fetching texture atlas {}: {}", url, e);
            return None;
        }
    };

    match TextureAtlas::from_png_bytes(&bytes) {
        Ok(atlas) => {
            log::info!("Loaded texture atlas from {}", url);
            Some(atlas)
        }
        Err(e) => {
            error!("Failed to decode texture atlas {}: {}", url, e);
            None
        }
    }
}

/// Fetches a resource relative to the page URL.
#[cfg(target_family = "wasm")]
async fn fetch_bytes(url: &str) -> Result<Vec<u8>, String> {
    let base = web_sys::window()
        .and_then(|window| window.location().href().ok())
        .ok_or_else(|| String::from("page location is unavailable"))?;
    let url = reqwest::Url::parse(&base)
        .and_then(|base| base.join(url))
        .map_err(|e| e.to_string())?;

    let response = reqwest::get(url)
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| e.to_string())?;
    let bytes = response.bytes().await.map_err(|e| e.to_string())?;
    Ok(bytes.to_vec())
}

/// Helper struct for managing the asynchronous initialization of graphics resources.
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<Graphics>>,
    atlas_source: String,
    size: (u32, u32),
}

/// Represents the possible states of the graphics initialization process.
///
/// This enum is used to track the current state of graphics resources
/// throughout the application's lifecycle.
pub enum MaybeGraphics {
    /// State during asynchronous graphics initialization
    Builder(GraphicsBuilder),

    /// State when graphics resources are fully initialized and ready for use
    Graphics(Graphics),

    /// State after graphics resources have been moved to another owner
    Moved,
}

impl GraphicsBuilder {
    /// Creates a new GraphicsBuilder with the specified event loop proxy.
    ///
    /// # Arguments
    /// * `event_loop_proxy` - Sends the initialized graphics resources back to the main thread
    /// * `atlas_source` - Atlas path on native targets, URL in the browser
    /// * `size` - Initial inner size of a native window
    pub fn new(
        event_loop_proxy: EventLoopProxy<Graphics>,
        atlas_source: String,
        size: (u32, u32),
    ) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
            atlas_source,
            size,
        }
    }

    /// Initiates the graphics initialization process.
    ///
    /// The window and surface are created immediately; the finished resources are sent back
    /// through the event loop proxy once the atlas is loaded. A failure to create the window
    /// ends the event loop.
    ///
    /// # Arguments
    /// * `event_loop` - The active event loop used to create the window
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            // event_loop_proxy is already spent - we already constructed Graphics
            return;
        };

        let gfx_fut = match create_graphics(event_loop, self.atlas_source.clone(), self.size) {
            Ok(gfx_fut) => gfx_fut,
            Err(e) => {
                error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        #[cfg(target_family = "wasm")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let gfx = gfx_fut.await;
                if event_loop_proxy.send_event(gfx).is_err() {
                    error!("Event loop closed before graphics were ready");
                }
            });
        }

        #[cfg(not(target_family = "wasm"))]
        {
            let gfx = pollster::block_on(gfx_fut);
            if event_loop_proxy.send_event(gfx).is_err() {
                error!("Event loop closed before graphics were ready");
            }
        }
    }
}
