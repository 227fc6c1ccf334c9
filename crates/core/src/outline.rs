//! The fixed content of the CoupleSnap overview deck.

use crate::types::LayoutKind;
use crate::units::{Emu, Points, Rgb};

/// File name the deck is saved under.
pub const OUTPUT_FILE: &str = "CoupleSnap_Presentation.pptx";

/// Page width in inches.
pub const SLIDE_WIDTH_INCHES: f64 = 10.0;

/// Page height in inches.
pub const SLIDE_HEIGHT_INCHES: f64 = 7.5;

/// Font size of the opening title.
pub const TITLE_FONT_SIZE: Points = Points(60);

/// Brand blue used for the opening title.
pub const TITLE_COLOR: Rgb = Rgb(0, 122, 255);

/// Content of one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideOutline {
    pub layout: LayoutKind,
    pub title: &'static str,
    /// Subtitle for the title layout, body for title+content.
    pub body: &'static str,
}

/// The ten slides, in order.
pub const OUTLINE: [SlideOutline; 10] = [
    SlideOutline {
        layout: LayoutKind::Title,
        title: "CoupleSnap",
        body: "Photo-First Messaging for Couples",
    },
    SlideOutline {
        layout: LayoutKind::TitleAndContent,
        title: "What is CoupleSnap?",
        body: concat!(
            "• Photo-first messaging app exclusively for couples\n",
            "• Every message must include a photo (primarily selfies)\n",
            "• Optional text overlay on photos\n",
            "• Dual-mode operation: Real-time & Asynchronous\n",
            "• Privacy-first: End-to-end encryption\n",
            "• No group features - just you and your partner",
        ),
    },
    SlideOutline {
        layout: LayoutKind::TitleAndContent,
        title: "Core Features",
        body: concat!(
            "📷 Camera-First Interface\n",
            "   • Opens directly to camera view\n",
            "   • Front-facing camera by default\n",
            "   • Quick flip, flash, timer support\n\n",
            "💬 Photo Messaging\n",
            "   • Every message requires a photo\n",
            "   • Image compression & encryption\n",
            "   • Multiple resolution generation\n\n",
            "✍️ Text Overlay\n",
            "   • Draggable positioning\n",
            "   • Multiple fonts & styles\n",
            "   • Adjustable size and color\n\n",
            "🔔 Push Notifications\n",
            "   • Rich media previews\n",
            "   • Quick actions\n",
        ),
    },
    SlideOutline {
        layout: LayoutKind::TitleAndContent,
        title: "Technology Stack",
        body: concat!(
            "Frontend:\n",
            "• React Native with TypeScript\n",
            "• Expo Camera\n",
            "• Zustand (State Management)\n",
            "• React Navigation\n\n",
            "Backend:\n",
            "• Firebase Authentication\n",
            "• Cloud Firestore (Real-time Database)\n",
            "• Firebase Storage (Media)\n",
            "• Firebase Cloud Functions\n",
            "• Firebase Cloud Messaging (Push)\n\n",
            "Security:\n",
            "• End-to-end encryption (AES-256)\n",
            "• Secure key storage",
        ),
    },
    SlideOutline {
        layout: LayoutKind::TitleAndContent,
        title: "User Experience Flow",
        body: concat!(
            "1. Open App → Camera View\n",
            "2. Take Photo (Selfie)\n",
            "3. Add Optional Text Overlay\n",
            "   • Drag to position\n",
            "   • Choose font & style\n",
            "4. Send to Partner\n",
            "5. Partner Receives:\n",
            "   • Real-time if both online\n",
            "   • Push notification if offline\n",
            "6. View & React",
        ),
    },
    SlideOutline {
        layout: LayoutKind::TitleAndContent,
        title: "What Makes Us Different",
        body: concat!(
            "✅ Photo-Only Messaging\n",
            "   Every message requires a photo\n\n",
            "✅ Couple-Exclusive\n",
            "   Private space for two people only\n\n",
            "✅ Dual-Mode Operation\n",
            "   Smart switching between real-time & async\n\n",
            "✅ Privacy-First\n",
            "   End-to-end encryption, no public feeds\n\n",
            "✅ Intentional Communication\n",
            "   Photos create more meaningful exchanges",
        ),
    },
    SlideOutline {
        layout: LayoutKind::TitleAndContent,
        title: "System Architecture",
        body: concat!(
            "Client Layer:\n",
            "• React Native App (iOS & Android)\n",
            "• 95% shared codebase\n",
            "• MVVM Pattern\n\n",
            "Backend Services:\n",
            "• Serverless Firebase Architecture\n",
            "• Auto-scaling & Multi-region\n",
            "• Real-time WebSocket connections\n\n",
            "Storage:\n",
            "• Firestore for data\n",
            "• Firebase Storage for media\n",
            "• CDN for fast delivery",
        ),
    },
    SlideOutline {
        layout: LayoutKind::TitleAndContent,
        title: "Security & Privacy",
        body: concat!(
            "🔒 End-to-End Encryption\n",
            "   • AES-256-GCM encryption\n",
            "   • RSA-2048 key pairs\n",
            "   • Forward secrecy\n\n",
            "🛡️ Authentication\n",
            "   • Phone number verification\n",
            "   • Biometric authentication support\n\n",
            "🔐 Data Protection\n",
            "   • Secure key storage (Keychain/Keystore)\n",
            "   • Certificate pinning\n",
            "   • Encrypted photo storage\n\n",
            "👥 Privacy Controls\n",
            "   • No public feeds\n",
            "   • No user discovery\n",
            "   • Read receipts & presence controls",
        ),
    },
    SlideOutline {
        layout: LayoutKind::TitleAndContent,
        title: "Future Enhancements",
        body: concat!(
            "Version 1.1:\n",
            "• Video messages (5-second clips)\n",
            "• Voice notes on photos\n",
            "• AR filters & effects\n",
            "• Scheduled messages\n\n",
            "Version 1.2:\n",
            "• Web app support\n",
            "• Apple Watch & Android Widgets\n",
            "• iPad optimized experience\n\n",
            "Version 2.0:\n",
            "• AI-powered features\n",
            "• Premium subscriptions\n",
            "• Physical photo products",
        ),
    },
    SlideOutline {
        layout: LayoutKind::TitleAndContent,
        title: "Thank You",
        body: concat!(
            "CoupleSnap\n",
            "Photo messaging for couples\n\n",
            "Making every moment visual\n",
            "and every exchange intentional\n\n",
            "Version 1.0",
        ),
    },
];

/// Page width as EMU.
pub fn slide_width() -> Emu {
    Emu::from_inches(SLIDE_WIDTH_INCHES)
}

/// Page height as EMU.
pub fn slide_height() -> Emu {
    Emu::from_inches(SLIDE_HEIGHT_INCHES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_layouts() {
        assert_eq!(OUTLINE[0].layout, LayoutKind::Title);
        assert!(OUTLINE[1..]
            .iter()
            .all(|s| s.layout == LayoutKind::TitleAndContent));
    }

    #[test]
    fn test_outline_preserves_glyphs() {
        assert!(OUTLINE[2].body.starts_with("📷 Camera-First Interface\n   • "));
        assert!(OUTLINE[2].body.ends_with("Quick actions\n"));
        assert!(OUTLINE[4].body.starts_with("1. Open App → Camera View"));
        assert!(OUTLINE[7].body.contains("🛡️ Authentication"));
    }
}
