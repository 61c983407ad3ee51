/*!
 * Core Module
 * Shared constants for the relay
 */

pub mod limits;
