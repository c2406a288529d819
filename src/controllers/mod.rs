mod ctl;
mod lighting;
mod temperature;

use myrtio_mesh_lighting::{CtlServer, EngineError, LightingServer, MeshPlatform, Timing};
use myrtio_mesh_model::{
    Handlers, Registry, RegistryError, RequestMeta, ServerHandlers,
    model::{
        GENERIC_LEVEL_SERVER, GENERIC_ONOFF_SERVER, GENERIC_POWER_ONOFF_SETUP_SERVER,
        GENERIC_TRANSITION_TIME_SERVER, LIGHT_CTL_SERVER, LIGHT_CTL_SETUP_SERVER,
        LIGHT_CTL_TEMPERATURE_SERVER, LIGHT_LIGHTNESS_SERVER, LIGHT_LIGHTNESS_SETUP_SERVER,
    },
    registry::{ClientRequestFn, StateChangedFn, StateRecallFn},
};

/// State the registry handlers operate on
pub(crate) struct NodeContext<P> {
    pub(crate) platform: P,
    pub(crate) lighting: LightingServer,
    pub(crate) ctl: CtlServer,
}

pub(crate) type NodeRegistry<P> = Registry<NodeContext<P>, EngineError>;

impl<P: MeshPlatform> NodeContext<P> {
    /// Lightness current and target, compared around lighting changes
    pub(crate) fn lightness(&self) -> (u16, u16) {
        (self.lighting.lightness_current(), self.lighting.lightness_target())
    }

    /// Report CTL again if the lighting server moved the lightness
    pub(crate) fn sync_ctl(&mut self, before: (u16, u16), remaining_ms: u32) {
        if self.lightness() != before {
            self.ctl
                .lightness_changed(&mut self.platform, &self.lighting, remaining_ms);
        }
    }
}

fn server<P: MeshPlatform>(
    client_request: ClientRequestFn<NodeContext<P>, EngineError>,
    state_changed: StateChangedFn<NodeContext<P>, EngineError>,
    state_recall: Option<StateRecallFn<NodeContext<P>, EngineError>>,
) -> Handlers<NodeContext<P>, EngineError> {
    Handlers::Server(ServerHandlers {
        client_request: Some(client_request),
        state_changed: Some(state_changed),
        state_recall,
    })
}

/// Register every server model of the node
///
/// The lighting models and the CTL servers live on the lighting element,
/// the CTL temperature server and the secondary level on the temperature
/// element.
pub(crate) fn register_models<P: MeshPlatform>(
    registry: &mut NodeRegistry<P>,
    lighting_element: u16,
    temperature_element: u16,
) -> Result<(), RegistryError> {
    let lighting = server(
        lighting::client_request::<P>,
        lighting::state_changed::<P>,
        Some(lighting::state_recall::<P>),
    );
    let lighting_setup = server(lighting::client_request::<P>, lighting::state_changed::<P>, None);
    let ctl = server(
        ctl::client_request::<P>,
        ctl::state_changed::<P>,
        Some(ctl::state_recall::<P>),
    );
    let ctl_setup = server(ctl::client_request::<P>, ctl::state_changed::<P>, None);
    let temperature = server(
        temperature::client_request::<P>,
        temperature::state_changed::<P>,
        Some(temperature::state_recall::<P>),
    );

    let models = [
        (GENERIC_ONOFF_SERVER, lighting_element, lighting),
        (GENERIC_POWER_ONOFF_SETUP_SERVER, lighting_element, lighting_setup),
        (GENERIC_TRANSITION_TIME_SERVER, lighting_element, lighting_setup),
        (LIGHT_LIGHTNESS_SERVER, lighting_element, lighting),
        (LIGHT_LIGHTNESS_SETUP_SERVER, lighting_element, lighting_setup),
        (GENERIC_LEVEL_SERVER, lighting_element, lighting),
        (LIGHT_CTL_SERVER, lighting_element, ctl),
        (LIGHT_CTL_SETUP_SERVER, lighting_element, ctl_setup),
        (LIGHT_CTL_TEMPERATURE_SERVER, temperature_element, temperature),
        (GENERIC_LEVEL_SERVER, temperature_element, temperature),
    ];
    for (model_id, element_index, handlers) in models {
        registry.register(model_id, element_index, handlers)?;
    }
    Ok(())
}

/// Time until a requested change completes
fn remaining_ms(meta: &RequestMeta) -> u32 {
    Timing::from(meta).remaining_ms()
}
