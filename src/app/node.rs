use myrtio_mesh_lighting::{CtlServer, LightingServer, MeshPlatform, TimerId};
use myrtio_mesh_model::{DispatchOutcome, MeshEvent};

use super::NodeError;
use crate::{
    config::NodeConfig,
    controllers::{NodeContext, NodeRegistry, register_models},
};

/// Mesh light node: lighting and CTL servers behind a model registry
///
/// The host feeds inbound mesh events into [`Self::dispatch`] and timer
/// expiries into [`Self::on_timer`].
pub struct MeshLightNode<P: MeshPlatform> {
    config: NodeConfig,
    context: NodeContext<P>,
    registry: NodeRegistry<P>,
}

impl<P: MeshPlatform> MeshLightNode<P> {
    pub fn new(platform: P, config: NodeConfig) -> Self {
        Self {
            context: NodeContext {
                platform,
                lighting: LightingServer::new(config.lighting),
                ctl: CtlServer::new(config.ctl),
            },
            registry: NodeRegistry::with_capacity(
                config.registry_capacity,
                config.registry_increment,
            ),
            config,
        }
    }

    /// Restore both servers and register their models
    pub fn init(&mut self) -> Result<(), NodeError> {
        let NodeContext {
            platform,
            lighting,
            ctl,
        } = &mut self.context;
        lighting.init(platform)?;
        ctl.init(platform, lighting)?;
        register_models(
            &mut self.registry,
            self.config.lighting.element_index,
            self.config.ctl.temperature_element_index,
        )?;
        log::info!(
            "node: {} models registered, lightness {} temperature {}",
            self.registry.len(),
            lighting.lightness_current(),
            ctl.record().temperature_current
        );
        Ok(())
    }

    /// Route an inbound event to the registered model
    pub fn dispatch(&mut self, event: &MeshEvent<'_>) -> Result<DispatchOutcome, NodeError> {
        let outcome = self.registry.dispatch_event(&mut self.context, event)?;
        Ok(outcome)
    }

    /// Deliver a timer expiry to the server owning it
    pub fn on_timer(&mut self, timer: TimerId) -> Result<(), NodeError> {
        match timer {
            TimerId::Lighting(timer) => {
                let before = self.context.lightness();
                let NodeContext {
                    platform, lighting, ..
                } = &mut self.context;
                lighting.on_timer(platform, timer)?;
                self.context.sync_ctl(before, 0);
            }
            TimerId::Ctl(timer) => {
                let NodeContext {
                    platform,
                    lighting,
                    ctl,
                } = &mut self.context;
                ctl.on_timer(platform, lighting, timer)?;
            }
        }
        Ok(())
    }

    /// Return both servers to defaults, erase their records and drop every
    /// registration
    pub fn reset(&mut self) -> Result<(), NodeError> {
        let NodeContext {
            platform,
            lighting,
            ctl,
        } = &mut self.context;
        lighting.reset(platform)?;
        ctl.reset(platform)?;
        self.registry.clear();
        log::info!("node: reset");
        Ok(())
    }

    /// Number of registered models
    pub fn model_count(&self) -> usize {
        self.registry.len()
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.context.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.context.platform
    }

    pub fn lighting(&self) -> &LightingServer {
        &self.context.lighting
    }

    pub fn ctl(&self) -> &CtlServer {
        &self.context.ctl
    }
}
