//! `calculate_size` is load-bearing: the batcher in `esphome-core` relies on
//! it (via `ESTIMATED_SIZE`/per-push sizing) to reserve buffer capacity
//! ahead of encoding. These tests verify every message type's
//! `calculate_size` exactly matches the bytes its own `encode` actually
//! produces, across arbitrary field values.

use esphome_proto::messages::core::{
    ConnectRequest, ConnectResponse, DeviceInfoResponse, HelloRequest, HelloResponse,
};
use esphome_proto::messages::entities::{
    BinarySensorStateResponse, CoverCommandRequest, LightCommandRequest,
    ListEntitiesSensorResponse, SensorStateResponse, SwitchCommandRequest,
};
use esphome_proto::ProtoMessage;
use proptest::prelude::*;

fn assert_size_matches<M: ProtoMessage>(msg: &M) {
    let mut buf = Vec::new();
    msg.encode(&mut buf);
    assert_eq!(
        buf.len(),
        msg.calculate_size(),
        "calculate_size diverged from encode for message type {}",
        M::MESSAGE_TYPE
    );
}

proptest! {
    #[test]
    fn hello_request_size_is_exact(
        client_info in ".{0,64}",
        major in any::<u32>(),
        minor in any::<u32>(),
    ) {
        assert_size_matches(&HelloRequest { client_info, api_version_major: major, api_version_minor: minor });
    }

    #[test]
    fn hello_response_size_is_exact(
        major in any::<u32>(), minor in any::<u32>(),
        server_info in ".{0,128}", name in ".{0,64}",
    ) {
        assert_size_matches(&HelloResponse { api_version_major: major, api_version_minor: minor, server_info, name });
    }

    #[test]
    fn connect_request_size_is_exact(password in ".{0,128}") {
        assert_size_matches(&ConnectRequest { password });
    }

    #[test]
    fn connect_response_size_is_exact(invalid_password in any::<bool>()) {
        assert_size_matches(&ConnectResponse { invalid_password });
    }

    #[test]
    fn sensor_state_response_size_is_exact(key in any::<u32>(), state in any::<f32>(), missing in any::<bool>()) {
        assert_size_matches(&SensorStateResponse { key, state, missing_state: missing });
    }

    #[test]
    fn binary_sensor_state_response_size_is_exact(key in any::<u32>(), state in any::<bool>(), missing in any::<bool>()) {
        assert_size_matches(&BinarySensorStateResponse { key, state, missing_state: missing });
    }

    #[test]
    fn switch_command_request_size_is_exact(key in any::<u32>(), state in any::<bool>()) {
        assert_size_matches(&SwitchCommandRequest { key, state });
    }

    #[test]
    fn light_command_request_size_is_exact(
        key in any::<u32>(),
        has_state in any::<bool>(), state in any::<bool>(),
        has_brightness in any::<bool>(), brightness in any::<f32>(),
    ) {
        assert_size_matches(&LightCommandRequest {
            key,
            has_state,
            state,
            has_brightness,
            brightness,
            ..Default::default()
        });
    }

    #[test]
    fn cover_command_request_size_is_exact(
        key in any::<u32>(),
        has_position in any::<bool>(), position in any::<f32>(),
    ) {
        assert_size_matches(&CoverCommandRequest { key, has_position, position, ..Default::default() });
    }

    #[test]
    fn list_entities_sensor_response_size_is_exact(
        key in any::<u32>(),
        object_id in ".{0,32}", name in ".{0,32}", unique_id in ".{0,32}",
        disabled_by_default in any::<bool>(), icon in ".{0,16}", entity_category in any::<u32>(),
    ) {
        assert_size_matches(&ListEntitiesSensorResponse {
            object_id, key, name, unique_id, disabled_by_default, icon, entity_category,
        });
    }

    #[test]
    fn device_info_response_size_is_exact(
        uses_password in any::<bool>(),
        name in ".{0,32}", mac_address in ".{0,32}", esphome_version in ".{0,16}",
    ) {
        assert_size_matches(&DeviceInfoResponse {
            uses_password,
            name,
            mac_address,
            esphome_version,
            ..Default::default()
        });
    }
}
