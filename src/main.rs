use std::sync::Arc;

use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

use accretion_lens::config::AppConfig;
use accretion_lens::rendering::{RenderError, Renderer};
use accretion_lens::simulation::Scene;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config_path = AppConfig::config_path();
    let config = AppConfig::load_or_default(&config_path);

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(config.window.title.as_str())
        .with_inner_size(winit::dpi::PhysicalSize::new(
            config.window.width,
            config.window.height,
        ))
        .build(&event_loop)?;
    let window = Arc::new(window);

    let size = window.inner_size();
    let mut scene = Scene::new(&config, size.width, size.height);
    let mut renderer = pollster::block_on(Renderer::new(window.clone()))?;

    log::info!(
        "Accretion lens started: {}x{}, {} particles, {:?} pipeline, seed {}",
        size.width,
        size.height,
        config.particle_count,
        config.mode,
        config.seed
    );
    log::info!("Controls: R reseed, M switch pipeline, P pause, Esc quit");

    let win_id = window.id();
    let win_clone = window.clone();
    event_loop.run(move |event, target| match event {
        Event::WindowEvent { event, window_id } if window_id == win_id => {
            match event {
                WindowEvent::Resized(size) => {
                    renderer.resize(size);
                    scene.resize(size.width, size.height);
                }
                WindowEvent::RedrawRequested => {
                    scene.update();
                    let frame = scene.render();
                    match renderer.present(frame) {
                        Ok(()) => {}
                        Err(RenderError::Surface(
                            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
                        )) => renderer.reconfigure(),
                        Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                            log::error!("Out of GPU memory, exiting");
                            target.exit();
                        }
                        Err(e) => log::warn!("Render error: {e}"),
                    }
                }
                ref other => scene.handle_window_event(other),
            }
            if scene.should_exit() {
                target.exit();
            }
        }
        Event::AboutToWait => win_clone.request_redraw(),
        _ => {}
    })?;
    Ok(())
}
