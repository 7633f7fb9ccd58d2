//! 应用程序主循环
//!
//! 把 winit 的窗口事件翻译为 [`BackendHost`] 的操作：
//!
//! | 事件                       | 操作                              |
//! |----------------------------|-----------------------------------|
//! | `AboutToWait`              | 渲染所有打开的窗口                |
//! | `RedrawRequested`          | 重新呈现该窗口                    |
//! | `Resized`                  | 重建交换链并立即重绘              |
//! | `CursorMoved`/`MouseInput` | 记录指针输入，下一帧交给 GUI      |
//! | `CloseRequested`           | 关闭窗口，全部关闭后退出          |
//! | `Escape`                   | 退出                              |

use tracing::{debug, error, info};
use winit::event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use crate::core::error::{DistOverlayError, Result};
use crate::gfx::BackendHost;

pub struct Application {
    host: BackendHost,
}

impl Application {
    pub fn new(host: BackendHost) -> Self {
        Self { host }
    }

    /// 运行消息循环，直到所有窗口关闭或按下 Escape
    ///
    /// 帧渲染失败时立即退出循环并返回该错误。
    pub fn run(mut self, event_loop: EventLoop<()>) -> anyhow::Result<()> {
        let mut failure: Option<DistOverlayError> = None;
        info!(backend = self.host.backend_name(), "Entering main loop...");

        event_loop.run(|event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);

            let result = match event {
                Event::WindowEvent { window_id, event } => {
                    self.on_window_event(window_id, event, elwt)
                }
                Event::AboutToWait => self.host.render_scene_for_all_contexts(),
                Event::LoopExiting => {
                    self.host.release();
                    Ok(())
                }
                _ => Ok(()),
            };

            if let Err(e) = result {
                error!("Frame failed: {}", e);
                failure = Some(e);
                elwt.exit();
            } else if !self.host.is_any_window_open() {
                elwt.exit();
            }
        })?;

        match failure {
            Some(e) => Err(e.into()),
            None => {
                info!("Main loop finished");
                Ok(())
            }
        }
    }

    fn on_window_event(
        &mut self,
        window_id: WindowId,
        event: WindowEvent,
        elwt: &EventLoopWindowTarget<()>,
    ) -> Result<()> {
        match event {
            WindowEvent::CloseRequested => {
                self.host.close_window(window_id);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                info!("Escape pressed, shutting down...");
                elwt.exit();
            }
            WindowEvent::Resized(size) => {
                debug!(width = size.width, height = size.height, "Window resized");
                self.host.on_resize_surface(window_id, size.width, size.height)?;
            }
            WindowEvent::RedrawRequested => {
                self.host.on_update(window_id)?;
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.host
                    .on_pointer_motion(window_id, position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.host
                    .on_pointer_button(window_id, state == ElementState::Pressed);
            }
            _ => {}
        }
        Ok(())
    }
}
