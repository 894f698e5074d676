//! Request and response codes understood by the remote peer
//!
//! The values are fixed by the broker and name server. The transport never
//! interprets them; they are here so callers do not scatter magic numbers.

/// Request codes
pub struct RequestCode;

impl RequestCode {
    // -------------------------------------------------------------------------
    // Name server
    // -------------------------------------------------------------------------
    pub const PUT_KV_CONFIG: i32 = 100;
    pub const GET_KV_CONFIG: i32 = 101;
    pub const DELETE_KV_CONFIG: i32 = 102;
    pub const GET_ROUTE_INFO_BY_TOPIC: i32 = 105;
    pub const GET_BROKER_CLUSTER_INFO: i32 = 106;
    pub const GET_ALL_TOPIC_LIST_FROM_NAMESRV: i32 = 206;
    pub const DELETE_TOPIC_IN_NAMESRV: i32 = 216;
    pub const GET_KV_LIST_BY_NAMESPACE: i32 = 219;
    pub const GET_TOPICS_BY_CLUSTER: i32 = 224;
    pub const UPDATE_NAMESRV_CONFIG: i32 = 318;
    pub const GET_NAMESRV_CONFIG: i32 = 319;

    // -------------------------------------------------------------------------
    // Broker
    // -------------------------------------------------------------------------
    pub const QUERY_MESSAGE: i32 = 12;
    pub const UPDATE_AND_CREATE_TOPIC: i32 = 17;
    pub const GET_ALL_TOPIC_CONFIG: i32 = 21;
    pub const UPDATE_BROKER_CONFIG: i32 = 25;
    pub const GET_BROKER_CONFIG: i32 = 26;
    pub const GET_BROKER_RUNTIME_INFO: i32 = 28;
    pub const SEARCH_OFFSET_BY_TIMESTAMP: i32 = 29;
    pub const GET_MAX_OFFSET: i32 = 30;
    pub const GET_MIN_OFFSET: i32 = 31;
    pub const VIEW_MESSAGE_BY_ID: i32 = 33;
    pub const WIPE_WRITE_PERM_OF_BROKER: i32 = 41;
    pub const ADD_WRITE_PERM_OF_BROKER: i32 = 42;
    pub const VIEW_BROKER_STATS_DATA: i32 = 210;
    pub const CLEAN_EXPIRED_CONSUME_QUEUE: i32 = 213;
    pub const CLEAN_UNUSED_TOPIC: i32 = 214;
    pub const DELETE_TOPIC_IN_BROKER: i32 = 215;
    pub const DELETE_EXPIRED_COMMIT_LOG: i32 = 217;
    pub const QUERY_CONSUME_QUEUE: i32 = 218;
    pub const GET_IN_SYNC_STATE_DATA: i32 = 338;
    pub const GET_BROKER_HA_STATUS: i32 = 339;
    pub const GET_BROKER_EPOCH_CACHE: i32 = 340;

    // -------------------------------------------------------------------------
    // Topics and subscriptions
    // -------------------------------------------------------------------------
    pub const UPDATE_AND_CREATE_SUBSCRIPTION_GROUP: i32 = 200;
    pub const GET_ALL_SUBSCRIPTION_GROUP_CONFIG: i32 = 201;
    pub const GET_TOPIC_STATS_INFO: i32 = 202;
    pub const GET_CONSUMER_CONNECTION_LIST: i32 = 203;
    pub const GET_PRODUCER_CONNECTION_LIST: i32 = 204;
    pub const DELETE_SUBSCRIPTION_GROUP: i32 = 207;
    pub const GET_CONSUME_STATS: i32 = 208;
    pub const GET_SUBSCRIPTION_GROUP_CONFIG: i32 = 209;
    pub const QUERY_TOPIC_CONSUME_BY_WHO: i32 = 300;
    pub const QUERY_CONSUME_TIME_SPAN: i32 = 302;
    pub const GET_CONSUME_STATUS: i32 = 304;
    pub const GET_PRODUCER_INFO: i32 = 305;
    pub const GET_CONSUMER_RUNNING_INFO: i32 = 307;
    pub const CONSUME_MESSAGE_DIRECTLY: i32 = 309;
    pub const QUERY_TOPICS_BY_CONSUMER: i32 = 343;
    pub const QUERY_SUBSCRIPTION: i32 = 344;
    pub const CREATE_STATIC_TOPIC: i32 = 345;

    // -------------------------------------------------------------------------
    // Offsets
    // -------------------------------------------------------------------------
    pub const RESET_CONSUMER_OFFSET: i32 = 220;
    pub const UPDATE_CONSUME_OFFSET: i32 = 221;
    pub const RESET_OFFSET_BY_QUEUE_ID: i32 = 222;

    // -------------------------------------------------------------------------
    // ACL
    // -------------------------------------------------------------------------
    pub const UPDATE_ACL_CONFIG: i32 = 328;
    pub const DELETE_ACL_CONFIG: i32 = 329;
    pub const GET_BROKER_ACL_CONFIG: i32 = 330;
    pub const CREATE_USER: i32 = 356;
    pub const UPDATE_USER: i32 = 357;
    pub const DELETE_USER: i32 = 358;
    pub const GET_USER: i32 = 359;
    pub const LIST_USER: i32 = 360;
    pub const CREATE_ACL: i32 = 361;
    pub const UPDATE_ACL: i32 = 362;
    pub const DELETE_ACL: i32 = 363;
    pub const GET_ACL: i32 = 364;
    pub const LIST_ACL: i32 = 365;

    // -------------------------------------------------------------------------
    // Controller
    // -------------------------------------------------------------------------
    pub const CONTROLLER_GET_METADATA_INFO: i32 = 501;
    pub const CONTROLLER_ELECT_MASTER: i32 = 503;
    pub const CONTROLLER_GET_CONFIG: i32 = 504;
    pub const CONTROLLER_UPDATE_CONFIG: i32 = 505;
    pub const CLEAN_CONTROLLER_BROKER_DATA: i32 = 506;
}

/// Response status codes
pub struct ResponseCode;

impl ResponseCode {
    pub const SUCCESS: i32 = 0;
    pub const SYSTEM_ERROR: i32 = 1;
    pub const SYSTEM_BUSY: i32 = 2;
    pub const REQUEST_CODE_NOT_SUPPORTED: i32 = 3;
    pub const TOPIC_NOT_EXIST: i32 = 17;
    pub const SUBSCRIPTION_NOT_EXIST: i32 = 21;
    pub const CONSUMER_NOT_ONLINE: i32 = 206;
}
