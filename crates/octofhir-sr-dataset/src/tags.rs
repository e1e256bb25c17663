//! Attribute tags used by the SR content tree
//!
//! Values follow PS3.6; names follow the attribute keywords.

use crate::Tag;

// === SOP Common / Patient / Study / Series ===

pub const SPECIFIC_CHARACTER_SET: Tag = Tag(0x0008, 0x0005);
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
pub const CONTENT_DATE: Tag = Tag(0x0008, 0x0023);
pub const STUDY_TIME: Tag = Tag(0x0008, 0x0030);
pub const CONTENT_TIME: Tag = Tag(0x0008, 0x0033);
pub const ACCESSION_NUMBER: Tag = Tag(0x0008, 0x0050);
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
pub const MANUFACTURER: Tag = Tag(0x0008, 0x0070);
pub const REFERRING_PHYSICIAN_NAME: Tag = Tag(0x0008, 0x0090);
pub const STUDY_DESCRIPTION: Tag = Tag(0x0008, 0x1030);
pub const SERIES_DESCRIPTION: Tag = Tag(0x0008, 0x103E);

pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
pub const PATIENT_BIRTH_DATE: Tag = Tag(0x0010, 0x0030);
pub const PATIENT_SEX: Tag = Tag(0x0010, 0x0040);

pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
pub const STUDY_ID: Tag = Tag(0x0020, 0x0010);
pub const SERIES_NUMBER: Tag = Tag(0x0020, 0x0011);
pub const INSTANCE_NUMBER: Tag = Tag(0x0020, 0x0013);
pub const FRAME_OF_REFERENCE_UID: Tag = Tag(0x0020, 0x0052);

// === Code Sequence Macro ===

pub const CODE_VALUE: Tag = Tag(0x0008, 0x0100);
pub const CODING_SCHEME_DESIGNATOR: Tag = Tag(0x0008, 0x0102);
pub const CODING_SCHEME_VERSION: Tag = Tag(0x0008, 0x0103);
pub const CODE_MEANING: Tag = Tag(0x0008, 0x0104);
pub const MAPPING_RESOURCE: Tag = Tag(0x0008, 0x0105);
pub const LONG_CODE_VALUE: Tag = Tag(0x0008, 0x0119);
pub const URN_CODE_VALUE: Tag = Tag(0x0008, 0x0120);

// === SOP Instance Reference Macro ===

pub const REFERENCED_SOP_CLASS_UID: Tag = Tag(0x0008, 0x1150);
pub const REFERENCED_SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x1155);
pub const REFERENCED_FRAME_NUMBER: Tag = Tag(0x0008, 0x1160);
pub const REFERENCED_SOP_SEQUENCE: Tag = Tag(0x0008, 0x1199);
pub const REFERENCED_SEGMENT_NUMBER: Tag = Tag(0x0062, 0x000B);
pub const REFERENCED_WAVEFORM_CHANNELS: Tag = Tag(0x0040, 0xA0B0);

// === SR Document Content ===

pub const RELATIONSHIP_TYPE: Tag = Tag(0x0040, 0xA010);
pub const VERIFYING_ORGANIZATION: Tag = Tag(0x0040, 0xA027);
pub const VERIFICATION_DATETIME: Tag = Tag(0x0040, 0xA030);
pub const OBSERVATION_DATETIME: Tag = Tag(0x0040, 0xA032);
pub const VALUE_TYPE: Tag = Tag(0x0040, 0xA040);
pub const CONCEPT_NAME_CODE_SEQUENCE: Tag = Tag(0x0040, 0xA043);
pub const CONTINUITY_OF_CONTENT: Tag = Tag(0x0040, 0xA050);
pub const VERIFYING_OBSERVER_SEQUENCE: Tag = Tag(0x0040, 0xA073);
pub const VERIFYING_OBSERVER_NAME: Tag = Tag(0x0040, 0xA075);
pub const DATETIME: Tag = Tag(0x0040, 0xA120);
pub const DATE: Tag = Tag(0x0040, 0xA121);
pub const TIME: Tag = Tag(0x0040, 0xA122);
pub const PERSON_NAME: Tag = Tag(0x0040, 0xA123);
pub const UID: Tag = Tag(0x0040, 0xA124);
pub const TEMPORAL_RANGE_TYPE: Tag = Tag(0x0040, 0xA130);
pub const REFERENCED_SAMPLE_POSITIONS: Tag = Tag(0x0040, 0xA132);
pub const REFERENCED_TIME_OFFSETS: Tag = Tag(0x0040, 0xA138);
pub const REFERENCED_DATETIME: Tag = Tag(0x0040, 0xA13A);
pub const TEXT_VALUE: Tag = Tag(0x0040, 0xA160);
pub const FLOATING_POINT_VALUE: Tag = Tag(0x0040, 0xA161);
pub const CONCEPT_CODE_SEQUENCE: Tag = Tag(0x0040, 0xA168);
pub const OBSERVATION_UID: Tag = Tag(0x0040, 0xA171);
pub const MEASURED_VALUE_SEQUENCE: Tag = Tag(0x0040, 0xA300);
pub const NUMERIC_VALUE_QUALIFIER_CODE_SEQUENCE: Tag = Tag(0x0040, 0xA301);
pub const NUMERIC_VALUE: Tag = Tag(0x0040, 0xA30A);
pub const COMPLETION_FLAG: Tag = Tag(0x0040, 0xA491);
pub const VERIFICATION_FLAG: Tag = Tag(0x0040, 0xA493);
pub const PRELIMINARY_FLAG: Tag = Tag(0x0040, 0xA496);
pub const CONTENT_TEMPLATE_SEQUENCE: Tag = Tag(0x0040, 0xA504);
pub const CONTENT_SEQUENCE: Tag = Tag(0x0040, 0xA730);
pub const TEMPLATE_IDENTIFIER: Tag = Tag(0x0040, 0xDB00);
pub const MEASUREMENT_UNITS_CODE_SEQUENCE: Tag = Tag(0x0040, 0x08EA);

// === Spatial Coordinates ===

pub const GRAPHIC_DATA: Tag = Tag(0x0070, 0x0022);
pub const GRAPHIC_TYPE: Tag = Tag(0x0070, 0x0023);

// === Sequence delimitation (explicit VR encoding) ===

pub const ITEM: Tag = Tag(0xFFFE, 0xE000);
pub const ITEM_DELIMITATION_ITEM: Tag = Tag(0xFFFE, 0xE00D);
pub const SEQUENCE_DELIMITATION_ITEM: Tag = Tag(0xFFFE, 0xE0DD);
